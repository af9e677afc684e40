pub mod csv;

pub use self::csv::{CSV_HEADER, render_csv};
