use crate::core::multipage::MultiPageGridResult;
use crate::error::KortError;
use crate::geom::parse::{measure_geometry, parse_geometry};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Settings for measuring the features of a CSV file.
#[derive(Debug, Clone)]
pub struct CsvMeasureConfig {
    /// Column holding WKT or GeoJSON in lng/lat
    pub geometry_column: String,
    pub exclude_columns: Vec<String>,
    /// Also write Danish display strings (`"1,5 km"`, `"5,0 ha"`)
    pub include_formatted: bool,
}

impl CsvMeasureConfig {
    /// # Example
    /// ```
    /// use kortprint_rs::CsvMeasureConfig;
    ///
    /// let config = CsvMeasureConfig::new("geometry").with_formatted();
    /// assert!(config.include_formatted);
    /// ```
    pub fn new(geometry_column: impl Into<String>) -> Self {
        Self {
            geometry_column: geometry_column.into(),
            exclude_columns: Vec::new(),
            include_formatted: false,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn with_formatted(mut self) -> Self {
        self.include_formatted = true;
        self
    }
}

pub trait MeasureCsv {
    fn to_measured_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvMeasureConfig,
    ) -> Result<usize, KortError>;
}

impl<P: AsRef<Path>> MeasureCsv for P {
    fn to_measured_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvMeasureConfig,
    ) -> Result<usize, KortError> {
        csv_to_measured_csv(self, output_path, config)
    }
}

/// Copies a CSV file, appending `distance_m` and `area_m2` for the geometry
/// in each row. Returns the number of rows written.
///
/// Rows are streamed, so large files are never held in memory.
///
/// ```no_run
/// use kortprint_rs::{CsvMeasureConfig, csv_to_measured_csv};
///
/// let config = CsvMeasureConfig::new("WKT").exclude(vec!["Note".into()]);
/// csv_to_measured_csv("routes.csv", "routes_measured.csv", &config).unwrap();
/// ```
pub fn csv_to_measured_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvMeasureConfig,
) -> Result<usize, KortError> {
    if config.geometry_column.is_empty() {
        return Err(KortError::CsvError(
            "Geometry column name cannot be empty".to_string(),
        ));
    }

    let file = File::open(csv_path).map_err(|e| KortError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| KortError::CsvError(e.to_string()))?
        .clone();

    let geom_idx = headers
        .iter()
        .position(|h| h == config.geometry_column)
        .ok_or_else(|| {
            KortError::CsvError(format!(
                "Geometry column '{}' not found",
                config.geometry_column
            ))
        })?;

    let exclude_indices: HashSet<usize> = config
        .exclude_columns
        .iter()
        .filter_map(|col| headers.iter().position(|h| h == col))
        .collect();

    let out_file = File::create(output_path).map_err(|e| KortError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !exclude_indices.contains(i))
        .map(|(_, h)| h)
        .collect();
    header_row.extend(["distance_m", "area_m2"]);
    if config.include_formatted {
        header_row.extend(["distance", "area"]);
    }
    writer
        .write_record(&header_row)
        .map_err(|e| KortError::CsvError(e.to_string()))?;

    let mut rows = 0;
    for result in reader.records() {
        let record = result.map_err(|e| KortError::CsvError(e.to_string()))?;

        let geom_str = record.get(geom_idx).ok_or_else(|| {
            KortError::CsvError(format!("Missing geometry column at index {}", geom_idx))
        })?;
        let measurement = measure_geometry(&parse_geometry(geom_str)?)?;

        let mut row: Vec<String> = record
            .iter()
            .enumerate()
            .filter(|(i, _)| !exclude_indices.contains(i))
            .map(|(_, field)| field.to_string())
            .collect();
        row.push(format!("{:.2}", measurement.distance_m));
        row.push(format!("{:.2}", measurement.area_m2));
        if config.include_formatted {
            row.push(measurement.distance);
            row.push(measurement.area);
        }

        writer
            .write_record(&row)
            .map_err(|e| KortError::CsvError(e.to_string()))?;
        rows += 1;
    }

    writer
        .flush()
        .map_err(|e| KortError::CsvError(e.to_string()))?;

    debug!(rows, "measured csv written");
    Ok(rows)
}

/// Writes one row per page of a multi-page print:
/// `label,row,col,north,south,east,west`.
pub fn write_page_index_csv(
    grid: &MultiPageGridResult,
    output_path: impl AsRef<Path>,
) -> Result<(), KortError> {
    let out_file = File::create(output_path).map_err(|e| KortError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    writer
        .write_record(["label", "row", "col", "north", "south", "east", "west"])
        .map_err(|e| KortError::CsvError(e.to_string()))?;

    for cell in grid.iter() {
        let b = &cell.bounds;
        writer
            .write_record([
                cell.label.clone(),
                cell.row.to_string(),
                cell.col.to_string(),
                b.north.to_string(),
                b.south.to_string(),
                b.east.to_string(),
                b.west.to_string(),
            ])
            .map_err(|e| KortError::CsvError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| KortError::CsvError(e.to_string()))?;
    Ok(())
}
