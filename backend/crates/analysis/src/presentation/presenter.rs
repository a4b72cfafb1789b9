//! Result Presenter
//!
//! Projects a finished result set into map markers and table rows. Pure and
//! deterministic; rendering itself belongs to the caller.

use std::fmt::Write as _;

use serde::Serialize;

use crate::domain::entities::EncroachmentRecord;
use crate::domain::geometry::GeometryCodec;
use crate::domain::value_objects::Coordinates;

/// Initial zoom for the result map
pub const DEFAULT_ZOOM: u8 = 13;

const TABLE_HEADERS: [&str; 4] = ["Type", "Location", "Affected Area (sq m)", "Nearest Boundary"];

/// One map pin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// `[lat, lon]`
    pub position: [f64; 2],
    pub popup: Vec<String>,
}

/// One table line, already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub affected_area: String,
    pub nearest_boundary: String,
}

impl TableRow {
    fn cells(&self) -> [&str; 4] {
        [
            self.kind.as_str(),
            self.location.as_str(),
            self.affected_area.as_str(),
            self.nearest_boundary.as_str(),
        ]
    }
}

/// Everything a map widget needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Read-only projection over a completed result set
#[derive(Debug, Clone, Copy)]
pub struct ResultPresenter<'a> {
    records: &'a [EncroachmentRecord],
}

impl<'a> ResultPresenter<'a> {
    pub fn new(records: &'a [EncroachmentRecord]) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record's location, or the fallback point when empty
    pub fn map_center(&self) -> Coordinates {
        self.records
            .first()
            .map(EncroachmentRecord::location)
            .unwrap_or(Coordinates::FALLBACK_CENTER)
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        self.records
            .iter()
            .map(|r| MapMarker {
                position: r.location().lat_lon(),
                popup: vec![
                    format!("Type: {}", r.kind()),
                    format!("Area: {:.4} sq m", r.affected_area_sq_m()),
                    format!("Near: {}", r.nearest_boundary_id().unwrap_or("Unknown")),
                ],
            })
            .collect()
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|r| TableRow {
                kind: r.kind().to_string(),
                location: GeometryCodec::encode(r.location()),
                affected_area: format!("{:.4}", r.affected_area_sq_m()),
                nearest_boundary: r.nearest_boundary_id().unwrap_or("-").to_string(),
            })
            .collect()
    }

    pub fn map_view(&self) -> MapView {
        MapView {
            center: self.map_center().lat_lon(),
            zoom: DEFAULT_ZOOM,
            markers: self.markers(),
        }
    }

    /// Plain-text table for terminal output
    pub fn render_table(&self) -> String {
        if self.records.is_empty() {
            return "No encroachments detected.\n".to_string();
        }

        let rows = self.table_rows();
        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        write_line(&mut out, TABLE_HEADERS, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let rule = [
            rule[0].as_str(),
            rule[1].as_str(),
            rule[2].as_str(),
            rule[3].as_str(),
        ];
        write_line(&mut out, rule, &widths);
        for row in &rows {
            write_line(&mut out, row.cells(), &widths);
        }
        out
    }
}

fn write_line(out: &mut String, cells: [&str; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, lon: f64, lat: f64, area: f64, near: Option<&str>) -> EncroachmentRecord {
        EncroachmentRecord::new(
            kind,
            Coordinates::new(lon, lat).unwrap(),
            area,
            near.map(str::to_string),
        )
        .unwrap()
    }

    fn sample() -> Vec<EncroachmentRecord> {
        vec![
            record("building", -73.9955, 40.7354, 0.0009492, Some("Main Road")),
            record("shed", -74.006, 40.7128, 4.000000000009777e-07, None),
        ]
    }

    #[test]
    fn test_center_is_first_record() {
        let records = sample();
        let presenter = ResultPresenter::new(&records);
        assert_eq!(presenter.map_center().pair(), (-73.9955, 40.7354));
        assert_eq!(presenter.map_view().center, [40.7354, -73.9955]);
    }

    #[test]
    fn test_center_fallback_when_empty() {
        let presenter = ResultPresenter::new(&[]);
        assert!(presenter.is_empty());
        assert_eq!(presenter.map_center().pair(), (-74.006, 40.7128));
        assert!(presenter.markers().is_empty());
        assert_eq!(presenter.map_view().zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_markers() {
        let records = sample();
        let markers = ResultPresenter::new(&records).markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].position, [40.7354, -73.9955]);
        assert_eq!(
            markers[0].popup,
            vec!["Type: building", "Area: 0.0009 sq m", "Near: Main Road"]
        );
        assert_eq!(markers[1].popup[2], "Near: Unknown");
    }

    #[test]
    fn test_table_rows() {
        let records = sample();
        let rows = ResultPresenter::new(&records).table_rows();
        assert_eq!(rows[0].location, "POINT (-73.9955 40.7354)");
        assert_eq!(rows[0].affected_area, "0.0009");
        assert_eq!(rows[1].affected_area, "0.0000");
        assert_eq!(rows[1].nearest_boundary, "-");
    }

    #[test]
    fn test_render_table() {
        let records = sample();
        let table = ResultPresenter::new(&records).render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Type     | Location"));
        assert!(lines[1].starts_with("--------"));
        assert!(lines[2].contains("Main Road"));

        assert_eq!(
            ResultPresenter::new(&[]).render_table(),
            "No encroachments detected.\n"
        );
    }

    #[test]
    fn test_presenter_is_deterministic() {
        let records = sample();
        let presenter = ResultPresenter::new(&records);
        assert_eq!(presenter.markers(), presenter.markers());
        assert_eq!(presenter.render_table(), presenter.render_table());
    }
}
