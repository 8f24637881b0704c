use anyhow::Error as AnyError;
use serde::Serialize;
use std::io::Write;
use viewshed::Overlay;

/// Prints a human readable description of `overlay`.
pub fn print_summary(overlay: &Overlay, out: &mut impl Write) -> Result<(), AnyError> {
    let Overlay {
        observer,
        mask,
        points,
        marker_radius_m,
    } = overlay;
    let bbox = mask.bbox();
    #[allow(clippy::cast_precision_loss)]
    let visible_pct = 100.0 * mask.visible_count() as f64 / mask.visible().len().max(1) as f64;
    writeln!(
        out,
        "tower: {},{} ({} m, viewer {} m)",
        observer.location.y, observer.location.x, observer.tower_height_m, observer.viewer_height_m
    )?;
    writeln!(
        out,
        "area: {},{} to {},{} ({}x{} cells)",
        bbox.min().y,
        bbox.min().x,
        bbox.max().y,
        bbox.max().x,
        mask.width(),
        mask.height()
    )?;
    writeln!(
        out,
        "visible: {} cells ({visible_pct:.1}%)",
        mask.visible_count()
    )?;
    writeln!(out, "markers: {} ({marker_radius_m} m radius)", points.len())?;
    Ok(())
}

/// Prints visible points as `[{"location": [lon, lat], "radius": r}]`.
pub fn print_json(overlay: &Overlay, out: &mut impl Write) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        location: [f64; 2],
        radius: f64,
    }

    let reshaped: Vec<JsonEntry> = overlay
        .points
        .iter()
        .map(|point| JsonEntry {
            location: [point.x, point.y],
            radius: overlay.marker_radius_m,
        })
        .collect();
    serde_json::to_writer(&mut *out, &reshaped)?;
    writeln!(out)?;
    Ok(())
}

/// Prints one `lat,lon` line per visible point.
pub fn print_csv(overlay: &Overlay, out: &mut impl Write) -> Result<(), AnyError> {
    writeln!(out, "Latitude,Longitude")?;
    for point in &overlay.points {
        writeln!(out, "{},{}", point.y, point.x)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{print_csv, print_json, print_summary};
    use geo::geometry::{Coord, Rect};
    use viewshed::{downsample, marker_radius_m, ElevationGrid, Georef, Observer, Overlay, VisibilityMask};

    fn overlay() -> Overlay {
        let georef = Georef::new(
            4,
            4,
            Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.01 }),
        );
        let grid = ElevationGrid::new(georef, vec![0.0; 16]);
        let observer = Observer {
            location: Coord { x: 0.005, y: 0.005 },
            tower_height_m: 100.0,
            viewer_height_m: 0.0,
        };
        let mask = VisibilityMask::builder()
            .observer(observer)
            .build(&grid, &mut |_: u8| ())
            .unwrap();
        Overlay {
            observer,
            points: downsample(&mask, 2),
            marker_radius_m: marker_radius_m(2),
            mask,
        }
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        print_json(&overlay(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"location": [0.0, 0.01], "radius": 50.0},
                {"location": [0.005, 0.01], "radius": 50.0},
                {"location": [0.0, 0.005], "radius": 50.0},
                {"location": [0.005, 0.005], "radius": 50.0},
            ])
        );
    }

    #[test]
    fn test_csv() {
        let mut out = Vec::new();
        print_csv(&overlay(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Latitude,Longitude");
        assert_eq!(lines[1], "0.01,0");
        assert_eq!(lines[4], "0.005,0.005");
    }

    #[test]
    fn test_summary() {
        let mut out = Vec::new();
        print_summary(&overlay(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("visible: 16 cells (100.0%)"));
        assert!(text.contains("markers: 4 (50 m radius)"));
    }
}
