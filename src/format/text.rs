//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::query::SearchMode;
use crate::session::MapSnapshot;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable summary"
    }

    fn format(&self, snapshot: &MapSnapshot) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str(&format!("prospect-map density ({})\n", snapshot.id));
        output.push_str(&format!(
            "Fetched: {}\n",
            snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Search: {}\n\n", describe_mode(&snapshot.mode)));

        // Results
        output.push_str("Results:\n");
        output.push_str(&format!("  Total listings: {}\n", snapshot.total));
        output.push_str(&format!(
            "  Points: {} ({} priced)\n",
            snapshot.density.len(),
            snapshot.priced_points()
        ));
        output.push_str(&format!("  Search areas: {}\n", snapshot.geometry.len()));

        match &snapshot.bounds {
            Some(b) => output.push_str(&format!(
                "  Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})\n",
                b.min_lng, b.min_lat, b.max_lng, b.max_lat
            )),
            None => output.push_str("  Bounds: none\n"),
        }

        Ok(output)
    }
}

fn describe_mode(mode: &SearchMode) -> String {
    match mode {
        SearchMode::NamedAddress {
            names,
            country,
            ad_type,
            ..
        } => format!("{} [{}, {}]", names, country, ad_type),
        SearchMode::DrawnPolygon {
            rings,
            country,
            ad_type,
        } => {
            let vertices: usize = rings.iter().map(Vec::len).sum();
            format!(
                "drawn polygon, {} vertices [{}, {}]",
                vertices, country, ad_type
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;
    use crate::geometry::GeoPoint;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&fixtures::snapshot()).unwrap();

        assert!(output.contains("prospect-map density"));
        assert!(output.contains("Search: Entroncamento [pt, sale]"));
        assert!(output.contains("Total listings: 2"));
        assert!(output.contains("Points: 2 (1 priced)"));
        assert!(output.contains("Search areas: 1"));
        assert!(output.contains("Bounds: (-9.000000, 39.000000) - (-8.000000, 40.000000)"));
    }

    #[test]
    fn test_describe_polygon_mode() {
        let mode = SearchMode::DrawnPolygon {
            rings: vec![vec![GeoPoint::new(0.0, 0.0); 4]],
            country: "pt".to_string(),
            ad_type: "rent".to_string(),
        };
        assert_eq!(describe_mode(&mode), "drawn polygon, 4 vertices [pt, rent]");
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
