// ==========================================
// 生猪运输排程仿真 - 地理距离
// ==========================================
// 大圆距离 (haversine), 地球半径 6371 km
// ==========================================

const EARTH_RADIUS_KM: f64 = 6371.0;

/// 两点间大圆距离 (km)
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// 闭合路线距离: depot → p1 → ... → pN → depot
///
/// 空路径距离为 0
pub fn tour_distance_km(depot: (f64, f64), path: &[(f64, f64)]) -> f64 {
    let (first, last) = match (path.first(), path.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };

    let legs: f64 = path
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum();
    haversine_km(depot, first) + legs + haversine_km(last, depot)
}
