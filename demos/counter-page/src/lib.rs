//! Counter page demo
//!
//! A page with a counter and a greeting, rendered on the server and hydrated
//! on the client with the same renderer.
//!
//! - [`reducer`]: counter state and actions
//! - [`page`]: the page component and its renderer
//! - [`template`]: the HTML document around the page
//! - [`server`]: the hyper server with page, API and static routes
//! - [`client`]: the client entry point
//! - [`cli`]: command-line settings

pub mod cli;
pub mod client;
pub mod page;
pub mod reducer;
pub mod server;
pub mod template;
