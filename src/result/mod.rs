//! Result shaping over lazy store results

mod lazy;
mod page;
mod projection;

pub use lazy::LazyList;
pub use page::{Page, Pageable};
pub use projection::ResultProjection;
