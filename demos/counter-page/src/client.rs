//! Client entry point of the counter page.

use crate::page::get_page_with;
use crate::reducer::{CounterReducer, set_interactive};
use isomorphic::prelude::{ClientOptions, Dispatch, Document, Error, PageSettings, Setup, Store};
use std::convert::Infallible;

/// Hydrates the counter page in `document` and makes it interactive.
pub async fn client_entry<D>(document: &D, settings: PageSettings) -> Result<Store<CounterReducer>, Error>
where
	D: Document + Clone + 'static,
{
	let options = ClientOptions::new().dispatch_client_setup_events(Setup::sync(
		|dispatch: &Dispatch<CounterReducer>| {
			set_interactive(dispatch);
			Ok::<_, Infallible>(())
		},
	));

	get_page_with(settings).client_main(document, options).await
}
