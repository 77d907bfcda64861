//! One balance chart per currency, with pan and zoom that feed narrower
//! ranges back into the fetcher.

mod render;
mod series;
mod view;

pub use render::chart_card;
pub use series::BalanceSeries;
pub use view::{ChartState, ChartView, FetchTicket, ZoomOutcome};
