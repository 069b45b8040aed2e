use crate::model::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points (haversine).
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let sin_phi = (d_phi / 2.0).sin();
    let sin_lambda = (d_lambda / 2.0).sin();
    let h = sin_phi * sin_phi + phi1.cos() * phi2.cos() * sin_lambda * sin_lambda;
    // Rounding can push h slightly outside [0, 1] near identical or antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total length of a polyline, summing consecutive segment distances.
pub fn pipeline_length(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(pair[0], pair[1]))
        .sum()
}

/// Planar mean of latitudes and longitudes taken independently.
///
/// Not a geodesic centroid; good enough at city scale.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), c| (lat + c.lat, lng + c.lng));
    let count = points.len() as f64;
    Some(Coordinate::new(lat / count, lng / count))
}

/// Bounding box as `(min, max)` corners.
pub fn bounds<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<(Coordinate, Coordinate)> {
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    let (min, max) = iter.fold((first, first), |(min, max), c| {
        (
            Coordinate::new(min.lat.min(c.lat), min.lng.min(c.lng)),
            Coordinate::new(max.lat.max(c.lat), max.lng.max(c.lng)),
        )
    });
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn distance_to_self_is_zero() {
        for p in [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(41.3851, 2.1734),
            Coordinate::new(-89.9, 179.9),
        ] {
            assert_eq!(distance(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(51.505, -0.09);
        let b = Coordinate::new(41.3851, 2.1734);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn one_degree_along_equator() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!(close(d, 111_194.93, 0.01), "got {d}");
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!(close(d, std::f64::consts::PI * EARTH_RADIUS_M, 1.0));
    }

    #[test]
    fn short_pipelines_have_zero_length() {
        assert_eq!(pipeline_length(&[]), 0.0);
        assert_eq!(pipeline_length(&[Coordinate::new(10.0, 10.0)]), 0.0);
    }

    #[test]
    fn pipeline_length_ignores_direction() {
        let mut pts = vec![
            Coordinate::new(51.505, -0.09),
            Coordinate::new(51.5052, -0.089),
            Coordinate::new(51.5054, -0.088),
        ];
        let forward = pipeline_length(&pts);
        pts.reverse();
        assert!(close(forward, pipeline_length(&pts), 1e-9));
        assert!(forward > 0.0);
    }

    #[test]
    fn centroid_is_planar_mean() {
        assert_eq!(centroid(&[]), None);
        let c = centroid(&[Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 4.0)]).unwrap();
        assert_eq!(c, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn bounds_cover_all_points() {
        let pts = [
            Coordinate::new(1.0, 5.0),
            Coordinate::new(-2.0, 7.0),
            Coordinate::new(3.0, -1.0),
        ];
        let (min, max) = bounds(&pts).unwrap();
        assert_eq!(min, Coordinate::new(-2.0, -1.0));
        assert_eq!(max, Coordinate::new(3.0, 7.0));
    }
}
