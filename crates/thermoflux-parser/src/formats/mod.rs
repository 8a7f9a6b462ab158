mod calrea_calibrated;
mod calrea_raw;
mod common;
mod ibutton;
pub mod schema;

pub use calrea_calibrated::CalreaCalibratedParser;
pub use calrea_raw::CalreaRawParser;
pub use ibutton::IButtonParser;

pub(crate) use common::{
    build_dataframe, coerce_f64, datetime_column, find_column, parse_row_timestamp, skip_preamble,
};
