pub mod company_record;
pub mod result_set;
pub mod scouting_params;

pub use company_record::*;
pub use result_set::*;
pub use scouting_params::*;
