use crate::na;

// Common types for all of simframe.
//
// Prefer referring to these through the crate root,
// e.g. `sf::Iso3`, rather than glob-importing them.
pub type Real = f64;

pub type Vec3 = na::Vector3<f64>;
pub type Pt3 = na::Point3<f64>;
pub type Rot3 = na::Rotation3<f64>;
pub type UnitQuat = na::UnitQuaternion<f64>;

/// Rigid transform (rotation then translation).
///
/// `X_AB` maps quantities expressed in frame B into frame A:
/// `p_A = X_AB * p_B`. Composing A->B with B->C is written
/// outer-first, i.e. `X_CA = X_CB * X_BA`.
pub type Iso3 = na::Isometry3<f64>;

pub fn iso_from_translation(translation: Vec3) -> Iso3 {
    Iso3::from_parts(na::Translation3::from(translation), UnitQuat::identity())
}

/// Pure rotation of `angle` radians about `axis`.
///
/// A zero `axis` gives the identity.
pub fn iso_from_axis_angle(axis: Vec3, angle: Real) -> Iso3 {
    match na::Unit::try_new(axis, 0.0) {
        Some(unit_axis) => Iso3::from_parts(
            na::Translation3::identity(),
            UnitQuat::from_axis_angle(&unit_axis, angle),
        ),
        None => Iso3::identity(),
    }
}

/// `true` if every component of the transform is finite.
pub fn iso_is_finite(iso: &Iso3) -> bool {
    iso.translation.vector.iter().all(|c| c.is_finite())
        && iso.rotation.coords.iter().all(|c| c.is_finite())
}
