//! Commonly used types for defining and rendering pages.
//!
//! ```
//! use isomorphic_pages::prelude::*;
//! ```

pub use crate::component::{
	Component, Event, EventType, IntoPage, Page, PageElement, StoreContext, component_fn,
};
pub use crate::dom::{Document, MemoryDocument};
pub use crate::engine::{HtmlEngine, ViewEngine};
pub use crate::error::{BoxError, Error};
pub use crate::hydration::HydrationError;
pub use crate::renderer::{ClientOptions, InitialHtmlOptions, PageRenderer, RenderContext, Setup};
pub use crate::settings::PageSettings;
pub use crate::store::{Dispatch, Reducer, Store, reducer_fn};
