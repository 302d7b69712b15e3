//! Topology completion on small closed and bordered meshes.

mod util;

use mesh_level::prelude::*;
use util::*;

#[test]
fn cube_derives_closed_manifold_topology() {
    let cube = cube();
    assert_eq!(cube.num_faces(), 6);
    assert_eq!(cube.num_vertices(), 8);
    assert_eq!(cube.num_edges(), 12);

    for e in 0..cube.num_edges() as Index {
        assert_eq!(cube.edge_faces(e).len(), 2, "closed mesh: edge {e}");
        let tag = cube.edge_tag(e);
        assert!(!tag.boundary);
        assert!(!tag.non_manifold);
    }
    for v in 0..cube.num_vertices() as Index {
        assert_eq!(cube.vertex_edges(v).len(), 3);
        assert_eq!(cube.vertex_faces(v).len(), 3);
        let tag = cube.vertex_tag(v);
        assert!(!tag.boundary);
        assert!(!tag.non_manifold);
        // Valence 3 is extraordinary for an interior vertex of a quad mesh.
        assert!(tag.extraordinary);
    }

    cube.validate_topology(ValidationOptions::default())
        .expect("completion output is consistent");
}

#[test]
fn face_edges_parallel_the_vertex_loop() {
    let cube = cube();
    for f in 0..cube.num_faces() as Index {
        let verts = cube.face_vertices(f);
        let edges = cube.face_edges(f);
        assert_eq!(verts.len(), edges.len());
        for i in 0..verts.len() {
            let v0 = verts[i];
            let v1 = verts[(i + 1) % verts.len()];
            assert_eq!(
                cube.find_edge(v0, v1),
                Some(edges[i]),
                "face {f} slot {i} connects verts {v0} and {v1}"
            );
        }
    }
}

#[test]
fn high_valence_hub_completes_cleanly() {
    // 8 spokes plus 8 rim edges; the hub's incidence lists are wider than
    // any inline accumulation region.
    let fan = triangle_fan();
    assert_eq!(fan.num_faces(), 8);
    assert_eq!(fan.num_vertices(), 9);
    assert_eq!(fan.num_edges(), 16);
    assert_eq!(fan.max_valence(), 8);

    let hub = fan.vertex_tag(0);
    assert!(!hub.non_manifold);
    assert!(!hub.boundary);
    assert!(hub.extraordinary);
    assert_eq!(fan.vertex_faces(0).len(), 8);
    assert_eq!(fan.vertex_edges(0).len(), 8);

    // Spokes are interior, the rim is the boundary.
    for rim in 1..9 {
        let spoke = fan.find_edge(0, rim).expect("spoke edge");
        assert_eq!(fan.edge_faces(spoke).len(), 2);
        assert!(!fan.edge_tag(spoke).boundary);
        assert!(fan.vertex_tag(rim).boundary);
    }
    let boundary_edges = (0..fan.num_edges() as Index)
        .filter(|&e| fan.edge_tag(e).boundary)
        .count();
    assert_eq!(boundary_edges, 8);

    fan.validate_topology(ValidationOptions::default())
        .expect("consistent");
}

#[test]
fn find_edge_only_matches_existing_pairs() {
    let cube = cube();
    assert!(cube.find_edge(0, 1).is_some());
    assert_eq!(cube.find_edge(0, 1), cube.find_edge(1, 0));
    // Vertices 0 and 5 lie on a face diagonal, not an edge.
    assert_eq!(cube.find_edge(0, 5), None);
    assert_eq!(cube.find_edge(0, 99), None);
}

#[test]
fn grid_tags_boundary_edges_and_vertices() {
    let grid = quad_grid(2, 2);
    assert_eq!(grid.num_vertices(), 9);
    assert_eq!(grid.num_faces(), 4);
    assert_eq!(grid.num_edges(), 12);

    let boundary_edges = (0..grid.num_edges() as Index)
        .filter(|&e| grid.edge_tag(e).boundary)
        .count();
    assert_eq!(boundary_edges, 8);

    // Corner vertex: valence 2, boundary, extraordinary (regular is 3).
    let corner = grid.vertex_tag(0);
    assert!(corner.boundary);
    assert!(corner.extraordinary);
    assert_eq!(grid.vertex_edges(0).len(), 2);

    // Boundary mid-edge vertex: valence 3, regular.
    let mid = grid.vertex_tag(1);
    assert!(mid.boundary);
    assert!(!mid.extraordinary);

    // Center vertex: interior, valence 4, regular.
    let center = grid.vertex_tag(4);
    assert!(!center.boundary);
    assert!(!center.extraordinary);
    assert!(!center.non_manifold);

    grid.validate_topology(ValidationOptions::default())
        .expect("consistent");
}

#[test]
fn local_indices_are_cached_correctly() {
    let grid = quad_grid(2, 2);
    for v in 0..grid.num_vertices() as Index {
        for (&f, &corner) in grid
            .vertex_faces(v)
            .iter()
            .zip(grid.vertex_face_local_indices(v))
        {
            assert_eq!(grid.face_vertices(f)[corner as usize], v);
        }
        for (&e, &end) in grid
            .vertex_edges(v)
            .iter()
            .zip(grid.vertex_edge_local_indices(v))
        {
            assert_eq!(grid.edge_vertices(e)[end as usize], v);
        }
    }
}

#[test]
fn completion_requires_populated_faces_and_no_edges() {
    let mut empty = Level::new();
    assert!(matches!(
        empty.complete_from_face_vertices(),
        Err(MeshLevelError::CompletionPrecondition { .. })
    ));

    let mut done = cube();
    assert!(matches!(
        done.complete_from_face_vertices(),
        Err(MeshLevelError::CompletionPrecondition { edges: 12, .. })
    ));
}

#[test]
fn completion_rejects_unassigned_corner() {
    let mut level = build_level(4, &[&[0, 1, 2, 3]]);
    level.face_vertices_mut(0)[2] = INDEX_INVALID;
    assert_eq!(
        level.complete_from_face_vertices().unwrap_err(),
        MeshLevelError::UnassignedFaceVertex { face: 0, corner: 2 }
    );
}

#[test]
fn completion_rejects_short_and_out_of_range_faces() {
    let mut too_small = Level::new();
    too_small.resize_vertices(2);
    too_small.resize_faces(1);
    too_small.resize_face_vertices(0, 2).unwrap();
    too_small.face_vertices_mut(0).copy_from_slice(&[0, 1]);
    assert_eq!(
        too_small.complete_from_face_vertices().unwrap_err(),
        MeshLevelError::FaceTooSmall { face: 0, corners: 2 }
    );

    let mut bad_ref = build_level(3, &[&[0, 1, 7]]);
    assert_eq!(
        bad_ref.complete_from_face_vertices().unwrap_err(),
        MeshLevelError::FaceVertexOutOfRange {
            face: 0,
            corner: 2,
            vertex: 7,
            verts: 3
        }
    );
}

#[test]
fn revisited_corner_aborts_completion() {
    // Vertex 0 appears at corners 0 and 2: no vertex-face entry could carry
    // both local indices, so the loop is rejected up front.
    let mut level = build_level(3, &[&[0, 1, 0, 2]]);
    assert_eq!(
        level.complete_from_face_vertices().unwrap_err(),
        MeshLevelError::RepeatedFaceVertex {
            face: 0,
            corner: 2,
            vertex: 0
        }
    );
}

#[test]
fn degenerate_edge_aborts_completion() {
    // A repeated corner creates an edge with coincident endpoints.
    let mut level = build_level(3, &[&[0, 0, 1, 2]]);
    assert!(matches!(
        level.complete_from_face_vertices().unwrap_err(),
        MeshLevelError::DegenerateEdge { vertex: 0, .. }
    ));
}

#[test]
fn bulk_constructor_checks_loop_lengths() {
    let level = Level::from_face_vertices(4, &[3, 3], &[0, 1, 2, 0, 2, 3]).expect("two triangles");
    assert_eq!(level.num_faces(), 2);
    assert_eq!(level.num_edges(), 5);

    assert_eq!(
        Level::from_face_vertices(4, &[3, 3], &[0, 1, 2]).unwrap_err(),
        MeshLevelError::FaceVertexLengthMismatch {
            expected: 6,
            found: 3
        }
    );
}

#[test]
fn faces_must_be_sized_in_order() {
    let mut level = Level::new();
    level.resize_vertices(8);
    level.resize_faces(3);
    level.resize_face_vertices(0, 4).unwrap();
    assert_eq!(
        level.resize_face_vertices(2, 4).unwrap_err(),
        MeshLevelError::FaceSizedOutOfOrder { face: 2, missing: 1 }
    );
}

#[test]
fn sharpness_drives_vertex_rules() {
    let mut grid = quad_grid(2, 2);

    // Two collinear sharp edges through the center vertex form a crease.
    let e_down = grid.find_edge(1, 4).expect("interior edge");
    let e_up = grid.find_edge(4, 7).expect("interior edge");
    grid.set_edge_sharpness(e_down, 2.0);
    grid.set_edge_sharpness(e_up, 2.0);
    // A sharp vertex is a corner regardless of its edges.
    grid.set_vertex_sharpness(8, INFINITELY_SHARP);
    grid.populate_vertex_rules();

    assert_eq!(grid.vertex_tag(4).rule, Rule::Crease);
    assert_eq!(grid.vertex_tag(1).rule, Rule::Dart);
    assert_eq!(grid.vertex_tag(8).rule, Rule::Corner);
    assert_eq!(grid.vertex_tag(3).rule, Rule::Smooth);
    assert!(grid.vertex_tag(8).inf_sharp);
    assert!(grid.edge_tag(e_down).semi_sharp);
}

#[test]
fn composite_tag_unions_corner_properties() {
    let mut grid = quad_grid(2, 2);
    grid.set_vertex_sharpness(0, 3.0);
    grid.populate_vertex_rules();

    // Face 0's corners are verts 0, 1, 4, 3.
    let composite = grid.composite_vertex_tag(grid.face_vertices(0));
    assert!(composite.boundary);
    assert!(composite.extraordinary);
    assert!(composite.semi_sharp);
    assert!(!composite.non_manifold);
    assert!(composite.rules.contains(Rule::Corner));
    assert!(composite.rules.contains(Rule::Smooth));
}

#[test]
fn hole_faces_are_tagged_not_removed() {
    let mut grid = quad_grid(2, 2);
    grid.set_face_hole(3, true);
    assert!(grid.face_tag(3).hole);
    assert!(!grid.face_tag(0).hole);
    assert_eq!(grid.num_faces(), 4);
    grid.set_face_hole(3, false);
    assert!(!grid.face_tag(3).hole);
}

#[test]
fn dump_reports_counts_and_relations() {
    let cube = cube();
    let dump = cube.dump_string();
    assert!(dump.starts_with("Level (depth 0):"));
    assert!(dump.contains("faces = 6"));
    assert!(dump.contains("edges = 12"));
    assert!(dump.contains("verts = 8"));
    assert!(dump.contains("face    0 verts:  4 [0 1 3 2]"));
    assert!(dump.contains("rule = <uninitialized>"));
}
