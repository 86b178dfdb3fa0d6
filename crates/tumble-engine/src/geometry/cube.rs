//! Built-in cube mesh.

/// Unit cube centred at the origin, half-extent 1.0.
///
/// 36 vertices (6 faces x 2 triangles), counter-clockwise when seen from
/// outside. Each row is `position(3) | texcoord(2) | normal(3)`.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 288] = [
    //  x,     y,     z,       u,     v,       nx,    ny,    nz
    // front (+Z)
     -1.0,  -1.0,   1.0,     0.0,   1.0,     0.0,   0.0,   1.0,
      1.0,  -1.0,   1.0,     1.0,   1.0,     0.0,   0.0,   1.0,
      1.0,   1.0,   1.0,     1.0,   0.0,     0.0,   0.0,   1.0,
     -1.0,  -1.0,   1.0,     0.0,   1.0,     0.0,   0.0,   1.0,
      1.0,   1.0,   1.0,     1.0,   0.0,     0.0,   0.0,   1.0,
     -1.0,   1.0,   1.0,     0.0,   0.0,     0.0,   0.0,   1.0,
    // back (-Z)
      1.0,  -1.0,  -1.0,     0.0,   1.0,     0.0,   0.0,  -1.0,
     -1.0,  -1.0,  -1.0,     1.0,   1.0,     0.0,   0.0,  -1.0,
     -1.0,   1.0,  -1.0,     1.0,   0.0,     0.0,   0.0,  -1.0,
      1.0,  -1.0,  -1.0,     0.0,   1.0,     0.0,   0.0,  -1.0,
     -1.0,   1.0,  -1.0,     1.0,   0.0,     0.0,   0.0,  -1.0,
      1.0,   1.0,  -1.0,     0.0,   0.0,     0.0,   0.0,  -1.0,
    // left (-X)
     -1.0,  -1.0,  -1.0,     0.0,   1.0,    -1.0,   0.0,   0.0,
     -1.0,  -1.0,   1.0,     1.0,   1.0,    -1.0,   0.0,   0.0,
     -1.0,   1.0,   1.0,     1.0,   0.0,    -1.0,   0.0,   0.0,
     -1.0,  -1.0,  -1.0,     0.0,   1.0,    -1.0,   0.0,   0.0,
     -1.0,   1.0,   1.0,     1.0,   0.0,    -1.0,   0.0,   0.0,
     -1.0,   1.0,  -1.0,     0.0,   0.0,    -1.0,   0.0,   0.0,
    // right (+X)
      1.0,  -1.0,   1.0,     0.0,   1.0,     1.0,   0.0,   0.0,
      1.0,  -1.0,  -1.0,     1.0,   1.0,     1.0,   0.0,   0.0,
      1.0,   1.0,  -1.0,     1.0,   0.0,     1.0,   0.0,   0.0,
      1.0,  -1.0,   1.0,     0.0,   1.0,     1.0,   0.0,   0.0,
      1.0,   1.0,  -1.0,     1.0,   0.0,     1.0,   0.0,   0.0,
      1.0,   1.0,   1.0,     0.0,   0.0,     1.0,   0.0,   0.0,
    // top (+Y)
     -1.0,   1.0,   1.0,     0.0,   1.0,     0.0,   1.0,   0.0,
      1.0,   1.0,   1.0,     1.0,   1.0,     0.0,   1.0,   0.0,
      1.0,   1.0,  -1.0,     1.0,   0.0,     0.0,   1.0,   0.0,
     -1.0,   1.0,   1.0,     0.0,   1.0,     0.0,   1.0,   0.0,
      1.0,   1.0,  -1.0,     1.0,   0.0,     0.0,   1.0,   0.0,
     -1.0,   1.0,  -1.0,     0.0,   0.0,     0.0,   1.0,   0.0,
    // bottom (-Y)
     -1.0,  -1.0,  -1.0,     0.0,   1.0,     0.0,  -1.0,   0.0,
      1.0,  -1.0,  -1.0,     1.0,   1.0,     0.0,  -1.0,   0.0,
      1.0,  -1.0,   1.0,     1.0,   0.0,     0.0,  -1.0,   0.0,
     -1.0,  -1.0,  -1.0,     0.0,   1.0,     0.0,  -1.0,   0.0,
      1.0,  -1.0,   1.0,     1.0,   0.0,     0.0,  -1.0,   0.0,
     -1.0,  -1.0,   1.0,     0.0,   0.0,     0.0,  -1.0,   0.0,
];
