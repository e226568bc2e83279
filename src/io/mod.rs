pub mod csv;

pub use csv::{CsvMeasureConfig, MeasureCsv, csv_to_measured_csv, write_page_index_csv};
