pub mod appearances;
pub mod competition;
pub mod config;
pub mod fitness;
pub mod fixture_page;
pub mod fixture_window;
pub mod fixtures_input;
pub mod http_client;
pub mod lineup;
pub mod lineup_fetch;
pub mod logging;
pub mod match_scrape;
pub mod matchday_locator;
pub mod normalize;
pub mod openligadb;
pub mod page_fetch;
pub mod persist;
pub mod pipeline;
pub mod slug;
pub mod upload;
