//! [Enphase Enlighten](https://developer.enphase.com/docs) system summary client.
//!
//! Resolve a system by its name once, then fetch its summary on demand or poll it
//! on a fixed interval:
//!
//! ```no_run
//! # async fn example() -> enlighten::Result {
//! use std::time::Duration;
//!
//! use enlighten::{Api, Credentials};
//! use tokio_util::sync::CancellationToken;
//!
//! let api = Api::connect(Credentials::new("key", "user"), "Home").await?;
//! println!("{}", api.get_summary().await?.current_power);
//!
//! let mut summaries = api.poll_summary(Duration::from_secs(300), &CancellationToken::new());
//! while let Some(summary) = summaries.next_summary().await {
//!     println!("{}", summary.current_power);
//! }
//! summaries.finish().await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod error;
mod poll;
mod prelude;
pub mod quantity;
mod session;
mod summary;
mod system;

pub use self::{
    api::Api,
    error::{Endpoint, Error, RequestFailure, Result},
    poll::{SummarySource, SummaryStream},
    session::{BASE_URL, Credentials, DEFAULT_TIMEOUT, Session},
    summary::Summary,
    system::{System, SystemId},
};
