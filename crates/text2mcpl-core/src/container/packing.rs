//! Adaptive projection packing of a unit direction and kinetic energy into
//! three floats (MCPL format 3).
//!
//! The component with the largest magnitude is dropped and its sign is carried
//! on the stored kinetic energy. When `x` or `y` is dropped, `1/z` takes the
//! freed slot; its magnitude exceeds 1, which tells the reader which
//! component to reconstruct.

pub fn pack_direction_ekin(direction: [f64; 3], ekin: f64) -> [f64; 3] {
    let [ux, uy, uz] = direction;
    let (ax, ay, az) = (ux.abs(), uy.abs(), uz.abs());

    if az >= ax && az >= ay {
        [ux, uy, ekin.copysign(uz)]
    } else if ay >= ax {
        [ux, 1.0 / uz, ekin.copysign(uy)]
    } else {
        [1.0 / uz, uy, ekin.copysign(ux)]
    }
}

pub fn unpack_direction_ekin(packed: [f64; 3]) -> ([f64; 3], f64) {
    let [p0, p1, p2] = packed;
    let ekin = p2.abs();
    let sign = if p2.is_sign_negative() { -1.0 } else { 1.0 };
    let remainder = |a: f64, b: f64| sign * (1.0 - a * a - b * b).max(0.0).sqrt();

    let direction = if p0.abs() > 1.0 {
        let uz = 1.0 / p0;
        [remainder(p1, uz), p1, uz]
    } else if p1.abs() > 1.0 {
        let uz = 1.0 / p1;
        [p0, remainder(p0, uz), uz]
    } else {
        [p0, p1, remainder(p0, p1)]
    };

    (direction, ekin)
}
