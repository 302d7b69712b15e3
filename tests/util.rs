//! Shared mesh builders for the integration tests.

#![allow(dead_code)]

use mesh_level::prelude::*;

/// Size a level for `vert_count` vertices and the given faces, filling each
/// face's vertex loop but not completing the topology.
pub fn build_level(vert_count: usize, faces: &[&[Index]]) -> Level {
    let mut level = Level::new();
    level.resize_vertices(vert_count);
    level.resize_faces(faces.len());
    for (f, verts) in faces.iter().enumerate() {
        level
            .resize_face_vertices(f as Index, verts.len())
            .expect("faces sized in order");
        level.face_vertices_mut(f as Index).copy_from_slice(verts);
    }
    level
}

/// [`build_level`] followed by topology completion.
pub fn completed(vert_count: usize, faces: &[&[Index]]) -> Level {
    let mut level = build_level(vert_count, faces);
    level
        .complete_from_face_vertices()
        .expect("completion succeeds");
    level
}

/// A closed quad cube: 8 vertices, 6 faces, 12 edges, no boundary. Every
/// vertex has valence 3.
pub fn cube() -> Level {
    completed(
        8,
        &[
            &[0, 1, 3, 2],
            &[2, 3, 5, 4],
            &[4, 5, 7, 6],
            &[6, 7, 1, 0],
            &[1, 7, 5, 3],
            &[6, 0, 2, 4],
        ],
    )
}

/// An `nx` by `ny` planar grid of quads: `(nx + 1) * (ny + 1)` vertices in
/// row-major order, all interior vertices regular.
pub fn quad_grid(nx: usize, ny: usize) -> Level {
    let stride = nx + 1;
    let faces: Vec<Vec<Index>> = (0..ny)
        .flat_map(|row| {
            (0..nx).map(move |col| {
                let v = (row * stride + col) as Index;
                let s = stride as Index;
                vec![v, v + 1, v + 1 + s, v + s]
            })
        })
        .collect();
    let refs: Vec<&[Index]> = faces.iter().map(|f| f.as_slice()).collect();
    completed(stride * (ny + 1), &refs)
}

/// Three quads all sharing the edge between vertices 0 and 1: that edge is
/// non-manifold, every other vertex remains a well-formed boundary vertex.
pub fn three_quads_one_edge() -> Level {
    completed(8, &[&[0, 1, 2, 3], &[1, 0, 4, 5], &[0, 1, 6, 7]])
}

/// Two triangles joined only at vertex 0 (a bowtie): no bad edges, but
/// vertex 0 admits no single rotational ordering.
pub fn bowtie() -> Level {
    completed(5, &[&[0, 1, 2], &[0, 3, 4]])
}

/// A closed fan of 8 triangles around hub vertex 0: the hub's valence is
/// well past the typical quad-mesh valence, so its incidence lists outgrow
/// the inline accumulation region during completion.
pub fn triangle_fan() -> Level {
    completed(
        9,
        &[
            &[0, 1, 2],
            &[0, 2, 3],
            &[0, 3, 4],
            &[0, 4, 5],
            &[0, 5, 6],
            &[0, 6, 7],
            &[0, 7, 8],
            &[0, 8, 1],
        ],
    )
}
