pub mod forecast;
pub mod series;
pub mod service;
pub mod short_term;

pub use forecast::*;
pub use series::*;
pub use service::*;
pub use short_term::*;
