use crate::error::KortError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 216 paper formats supported for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperFormat {
    A5,
    #[default]
    A4,
    A3,
    A2,
}

impl PaperFormat {
    pub const ALL: [PaperFormat; 4] = [
        PaperFormat::A5,
        PaperFormat::A4,
        PaperFormat::A3,
        PaperFormat::A2,
    ];

    /// Nominal portrait `(width, height)` in millimetres.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperFormat::A5 => (148.0, 210.0),
            PaperFormat::A4 => (210.0, 297.0),
            PaperFormat::A3 => (297.0, 420.0),
            PaperFormat::A2 => (420.0, 594.0),
        }
    }

    /// Nominal `(width, height)` for the given orientation.
    pub fn oriented_mm(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaperFormat::A5 => "A5",
            PaperFormat::A4 => "A4",
            PaperFormat::A3 => "A3",
            PaperFormat::A2 => "A2",
        }
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaperFormat {
    type Err = KortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A5" => Ok(PaperFormat::A5),
            "A4" => Ok(PaperFormat::A4),
            "A3" => Ok(PaperFormat::A3),
            "A2" => Ok(PaperFormat::A2),
            _ => Err(KortError::UnknownPaperFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = KortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            _ => Err(KortError::UnknownOrientation(s.to_string())),
        }
    }
}

/// Raster resolutions offered for the rendered map image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DpiOption {
    Dpi150,
    Dpi200,
    #[default]
    Dpi300,
}

impl DpiOption {
    pub fn value(self) -> u32 {
        match self {
            DpiOption::Dpi150 => 150,
            DpiOption::Dpi200 => 200,
            DpiOption::Dpi300 => 300,
        }
    }
}

impl TryFrom<u32> for DpiOption {
    type Error = KortError;

    fn try_from(dpi: u32) -> Result<Self, Self::Error> {
        match dpi {
            150 => Ok(DpiOption::Dpi150),
            200 => Ok(DpiOption::Dpi200),
            300 => Ok(DpiOption::Dpi300),
            other => Err(KortError::InvalidDpi(other)),
        }
    }
}

impl From<DpiOption> for u32 {
    fn from(dpi: DpiOption) -> Self {
        dpi.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_swaps_dimensions() {
        for format in PaperFormat::ALL {
            let (w, h) = format.oriented_mm(Orientation::Portrait);
            assert_eq!(format.oriented_mm(Orientation::Landscape), (h, w));
        }
    }

    #[test]
    fn test_parse_paper_format() -> Result<(), KortError> {
        assert_eq!("a3".parse::<PaperFormat>()?, PaperFormat::A3);
        assert_eq!(PaperFormat::A2.to_string(), "A2");
        assert!(matches!(
            "A6".parse::<PaperFormat>(),
            Err(KortError::UnknownPaperFormat(_))
        ));
        Ok(())
    }

    #[test]
    fn test_parse_orientation() -> Result<(), KortError> {
        assert_eq!("Landscape".parse::<Orientation>()?, Orientation::Landscape);
        assert_eq!("p".parse::<Orientation>()?, Orientation::Portrait);
        assert!("sideways".parse::<Orientation>().is_err());
        Ok(())
    }

    #[test]
    fn test_dpi_options() {
        assert_eq!(DpiOption::try_from(200), Ok(DpiOption::Dpi200));
        assert_eq!(DpiOption::try_from(72), Err(KortError::InvalidDpi(72)));
        assert_eq!(u32::from(DpiOption::default()), 300);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&(PaperFormat::A5, Orientation::Landscape, DpiOption::Dpi150))
            .unwrap_or_default();
        assert_eq!(json, r#"["A5","landscape",150]"#);
    }
}
