use super::*;
use nalgebra::vector;

fn square() -> Dcel {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    Dcel::from_graph(&pts, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
}

fn square_with_diagonal() -> Dcel {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    Dcel::from_graph(&pts, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap()
}

/// 2×2 grid of unit cells on [0,2]².
fn grid() -> Dcel {
    let mut pts = Vec::new();
    for j in 0..3 {
        for i in 0..3 {
            pts.push(vector![i as f64, j as f64]);
        }
    }
    let edges = [
        (0, 1),
        (1, 2),
        (3, 4),
        (4, 5),
        (6, 7),
        (7, 8),
        (0, 3),
        (3, 6),
        (1, 4),
        (4, 7),
        (2, 5),
        (5, 8),
    ];
    Dcel::from_graph(&pts, &edges).unwrap()
}

fn vid(d: &Dcel, i: usize) -> VertexId {
    d.vertex_ids().nth(i).unwrap()
}

fn half_edge_between(d: &Dcel, u: VertexId, v: VertexId) -> HalfEdgeId {
    d.vertex(u)
        .unwrap()
        .outgoing
        .iter()
        .copied()
        .find(|&h| d.dest(h).unwrap() == v)
        .unwrap()
}

fn assert_euler(d: &Dcel) {
    assert_eq!(d.euler_characteristic(), 2);
    assert_eq!(d.num_half_edges(), 2 * d.num_edges());
}

#[test]
fn square_has_one_bounded_and_one_unbounded_face() {
    let d = square();
    assert_eq!(d.num_vertices(), 4);
    assert_eq!(d.num_edges(), 4);
    assert_eq!(d.num_faces(), 2);
    assert_euler(&d);
    d.validate().unwrap();

    let outer = d.unbounded_face().unwrap();
    assert_eq!(d.winding(outer).unwrap(), Winding::Clockwise);
    assert!((d.signed_area(outer).unwrap() + 1.0).abs() < 1e-12);
    let inner = d.face_ids().find(|&f| f != outer).unwrap();
    assert_eq!(d.winding(inner).unwrap(), Winding::CounterClockwise);
    assert!((d.signed_area(inner).unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(d.degree(inner).unwrap(), 4);
}

#[test]
fn twins_and_links_are_symmetric() {
    let d = grid();
    for h in d.half_edge_ids() {
        let t = d.twin(h).unwrap();
        assert_ne!(h, t);
        assert_eq!(d.twin(t).unwrap(), h);
        assert_eq!(d.origin(t).unwrap(), d.dest(h).unwrap());
        assert_eq!(d.prev(d.next(h).unwrap()).unwrap(), h);
        assert_eq!(d.bounding(d.next(h).unwrap()).unwrap(), d.bounding(h).unwrap());
    }
    assert_eq!(d.num_faces(), 5);
    assert_euler(&d);
}

#[test]
fn edges_name_each_pair_once() {
    let d = grid();
    let edges: Vec<EdgeId> = d.edges().collect();
    assert_eq!(edges.len(), 12);
    for e in &edges {
        let h = e.half_edge();
        assert_eq!(d.edge(h).unwrap(), *e);
        assert_eq!(d.edge(d.twin(h).unwrap()).unwrap(), *e);
    }
}

#[test]
fn vertex_star_runs_counterclockwise() {
    let d = grid();
    let center = vid(&d, 4);
    let star = d.vertex_star(center).unwrap();
    assert_eq!(star.len(), 4);
    let angle = |h: HalfEdgeId| {
        let dir = d.position(d.dest(h).unwrap()).unwrap() - d.position(center).unwrap();
        dir.y.atan2(dir.x)
    };
    // Successive directions turn left by a quarter turn.
    for w in 0..4 {
        let a = angle(star[w]);
        let b = angle(star[(w + 1) % 4]);
        let turn = (b - a).rem_euclid(std::f64::consts::TAU);
        assert!((turn - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}

#[test]
fn construction_rejects_bad_input() {
    let tri = [vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]];
    assert!(matches!(
        Dcel::from_graph(&tri, &[(0, 1), (1, 2), (2, 5)]),
        Err(ConstructionError::IndexOutOfRange { index: 5, .. })
    ));
    assert!(matches!(
        Dcel::from_graph(&tri, &[(0, 1), (1, 1), (2, 0)]),
        Err(ConstructionError::SelfLoop { edge: 1 })
    ));
    assert!(matches!(
        Dcel::from_graph(&tri, &[(0, 1), (1, 2), (2, 0), (1, 0)]),
        Err(ConstructionError::DuplicateEdge { edge: 3 })
    ));
    assert!(matches!(
        Dcel::from_graph(&tri, &[(0, 1), (1, 2)]),
        Err(ConstructionError::DanglingVertex { .. })
    ));
    let bad = [vector![0.0, 0.0], vector![f64::NAN, 0.0], vector![0.0, 1.0]];
    assert!(matches!(
        Dcel::from_graph(&bad, &[(0, 1), (1, 2), (2, 0)]),
        Err(ConstructionError::NonFinite { vertex: 1 })
    ));
}

#[test]
fn construction_rejects_disconnected_input() {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
        vector![5.0, 5.0],
        vector![6.0, 5.0],
        vector![5.0, 6.0],
    ];
    let edges = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)];
    assert!(matches!(
        Dcel::from_graph(&pts, &edges),
        Err(ConstructionError::Disconnected { unreached: 6 })
    ));
}

#[test]
fn split_edge_inserts_a_vertex() {
    let mut d = square();
    let (a, b) = (vid(&d, 0), vid(&d, 1));
    let h = half_edge_between(&d, a, b);
    let outer = d.unbounded_face().unwrap();
    let inner = d.bounding(h).unwrap();

    let m = d.split_edge(vector![0.5, 0.0], h).unwrap();
    assert_eq!(d.position(m).unwrap(), vector![0.5, 0.0]);
    assert_eq!(d.num_vertices(), 5);
    assert_eq!(d.num_half_edges(), 10);
    assert_eq!(d.num_faces(), 2);
    assert_eq!(d.degree(inner).unwrap(), 5);
    assert_eq!(d.degree(outer).unwrap(), 5);
    assert_euler(&d);
    d.validate().unwrap();

    assert_eq!(d.next(h), Err(PreconditionError::StaleHalfEdge(h)));
    let into_m = half_edge_between(&d, a, m);
    assert_eq!(d.dest(d.next(into_m).unwrap()).unwrap(), b);
}

#[test]
fn split_edge_snaps_to_endpoints() {
    let mut d = square();
    let (a, b) = (vid(&d, 0), vid(&d, 1));
    let h = half_edge_between(&d, a, b);
    assert_eq!(d.split_edge(vector![0.0, 0.0], h).unwrap(), a);
    assert_eq!(d.split_edge(vector![1.0 - 1e-14, 0.0], h).unwrap(), b);
    assert_eq!(d.num_vertices(), 4);
    assert!(d.has_half_edge(h));
    assert_eq!(
        d.split_edge(vector![f64::NAN, 0.0], h),
        Err(PreconditionError::NonFinitePoint)
    );
}

#[test]
fn split_edge_rejects_points_off_the_edge() {
    let mut d = square();
    let (a, b) = (vid(&d, 0), vid(&d, 1));
    let h = half_edge_between(&d, a, b);
    let before = d.counts();
    for p in [vector![0.5, 0.3], vector![1.5, 0.0], vector![-0.25, 0.0]] {
        assert_eq!(
            d.split_edge(p, h),
            Err(PreconditionError::PointOffEdge { edge: h })
        );
    }
    assert_eq!(d.counts(), before);
    assert!(d.has_half_edge(h));

    // Rounding noise off the line is tolerated.
    let m = d.split_edge(vector![0.25, 1e-13], h).unwrap();
    assert_eq!(d.counts(), (before.0 + 1, before.1 + 2, before.2));
    assert_eq!(d.position(m).unwrap(), vector![0.25, 1e-13]);
    d.validate().unwrap();
}

#[test]
fn split_face_then_merge_restores_counts() {
    let mut d = square();
    let outer = d.unbounded_face().unwrap();
    let inner = d.face_ids().find(|&f| f != outer).unwrap();
    d.set_payload(inner, Some(vector![0.5, 0.5])).unwrap();
    let (a, c) = (vid(&d, 0), vid(&d, 2));

    let e = d.split_face(inner, a, c).unwrap();
    assert!(!d.has_face(inner));
    assert_eq!(d.num_faces(), 3);
    assert_eq!(d.num_edges(), 5);
    assert_euler(&d);
    d.validate().unwrap();
    assert_eq!(d.origin(e).unwrap(), a);
    assert_eq!(d.dest(e).unwrap(), c);

    let left = d.bounding(e).unwrap();
    let right = d.bounding(d.twin(e).unwrap()).unwrap();
    assert_ne!(left, right);
    for f in [left, right] {
        assert_eq!(d.payload(f).unwrap(), Some(vector![0.5, 0.5]));
        assert_eq!(d.degree(f).unwrap(), 3);
        assert!((d.signed_area(f).unwrap() - 0.5).abs() < 1e-12);
    }

    let merged = d.merge_faces(left, right, e).unwrap();
    assert_eq!(merged, left);
    assert!(!d.has_face(right));
    assert_eq!(d.num_faces(), 2);
    assert_eq!(d.num_edges(), 4);
    assert_eq!(d.degree(merged).unwrap(), 4);
    assert_euler(&d);
    d.validate().unwrap();
}

#[test]
fn split_face_preconditions() {
    let mut d = square_with_diagonal();
    let (a, b, c, dd) = (vid(&d, 0), vid(&d, 1), vid(&d, 2), vid(&d, 3));
    let lower = d.locate(vector![0.75, 0.25]).unwrap().unwrap();

    assert_eq!(d.split_face(lower, a, a), Err(PreconditionError::SameVertex(a)));
    assert!(matches!(
        d.split_face(lower, b, dd),
        Err(PreconditionError::VertexNotOnFace { .. })
    ));
    assert!(matches!(
        d.split_face(lower, a, c),
        Err(PreconditionError::AlreadyJoined { .. })
    ));
    assert_eq!(d.num_faces(), 3);
    d.validate().unwrap();
}

#[test]
fn merge_faces_preconditions() {
    let mut d = square_with_diagonal();
    let (a, c) = (vid(&d, 0), vid(&d, 2));
    let diag = half_edge_between(&d, a, c);
    let outer = d.unbounded_face().unwrap();
    let lower = d.locate(vector![0.75, 0.25]).unwrap().unwrap();
    assert!(matches!(
        d.merge_faces(lower, outer, diag),
        Err(PreconditionError::FacesNotAdjacent { .. })
    ));

    // Two squares joined by a bridge.
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
        vector![2.0, 0.0],
        vector![3.0, 0.0],
        vector![3.0, 1.0],
        vector![2.0, 1.0],
    ];
    let edges = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (1, 4),
    ];
    let mut d = Dcel::from_graph(&pts, &edges).unwrap();
    assert_eq!(d.num_faces(), 3);
    let bridge = half_edge_between(&d, vid(&d, 1), vid(&d, 4));
    let outer = d.unbounded_face().unwrap();
    assert_eq!(d.step_over_edge(outer, bridge).unwrap(), outer);
    assert_eq!(
        d.merge_faces(outer, outer, bridge),
        Err(PreconditionError::WouldDisconnect { link: bridge })
    );
    d.validate().unwrap();
}

#[test]
fn locate_finds_the_containing_face() {
    let d = square_with_diagonal();
    let outer = d.unbounded_face().unwrap();
    let lower = d.locate(vector![0.75, 0.25]).unwrap().unwrap();
    let upper = d.locate(vector![0.25, 0.75]).unwrap().unwrap();
    assert_ne!(lower, upper);
    assert_ne!(lower, outer);
    assert!(d.inside(vector![0.9, 0.1], lower).unwrap());
    assert!(d.inside_convex(vector![0.9, 0.1], lower).unwrap());
    assert!(!d.inside(vector![0.1, 0.9], lower).unwrap());
    assert_eq!(d.locate(vector![5.0, 5.0]).unwrap(), Some(outer));
    assert!(d.inside(vector![5.0, 5.0], outer).unwrap());
    assert_eq!(d.locate(vector![f64::INFINITY, 0.0]), Err(PreconditionError::NonFinitePoint));
}

#[test]
fn stale_handles_are_rejected() {
    let mut d = square();
    let outer = d.unbounded_face().unwrap();
    let inner = d.face_ids().find(|&f| f != outer).unwrap();
    let (a, c) = (vid(&d, 0), vid(&d, 2));
    d.split_face(inner, a, c).unwrap();
    assert_eq!(d.face(inner).err(), Some(PreconditionError::StaleFace(inner)));
    assert_eq!(d.degree(inner), Err(PreconditionError::StaleFace(inner)));
    assert_eq!(
        d.split_face(inner, a, c),
        Err(PreconditionError::StaleFace(inner))
    );
}

#[test]
fn nth_face_bounds() {
    let d = square();
    assert!(d.nth_face(1).is_ok());
    assert_eq!(
        d.nth_face(2),
        Err(PreconditionError::FaceIndexOutOfRange { index: 2, faces: 2 })
    );
}

#[test]
fn delete_interior_absorbs_a_grid() {
    let mut d = grid();
    let outer = d.unbounded_face().unwrap();
    let outline: Vec<HalfEdgeId> = d.boundary(outer).unwrap().collect();
    let hint = d.locate(vector![0.5, 0.5]).unwrap().unwrap();
    d.set_payload(hint, Some(vector![0.5, 0.5])).unwrap();

    let region = d.delete_interior(&outline, hint).unwrap();
    assert_eq!(region, hint);
    // Corners and side midpoints survive; the center goes with its last edge.
    assert_eq!(d.num_vertices(), 8);
    assert_eq!(d.num_edges(), 8);
    assert_eq!(d.num_faces(), 2);
    assert_eq!(d.degree(region).unwrap(), 8);
    assert!((d.signed_area(region).unwrap() - 4.0).abs() < 1e-12);
    assert_eq!(d.payload(region).unwrap(), Some(vector![0.5, 0.5]));
    assert_euler(&d);
    d.validate().unwrap();
}

#[test]
fn delete_interior_rejects_the_unbounded_hint() {
    let mut d = grid();
    let outer = d.unbounded_face().unwrap();
    let outline: Vec<HalfEdgeId> = d.boundary(outer).unwrap().collect();
    assert_eq!(
        d.delete_interior(&outline, outer),
        Err(PreconditionError::UnboundedHint(outer))
    );
    assert_eq!(d.num_faces(), 5);
}

#[test]
fn delete_interior_respects_an_inner_outline() {
    // Keep the vertical midline: the two left cells and the two right cells
    // merge separately.
    let mut d = grid();
    let (b0, b1, b2) = (vid(&d, 1), vid(&d, 4), vid(&d, 7));
    let outer = d.unbounded_face().unwrap();
    let mut outline: Vec<HalfEdgeId> = d.boundary(outer).unwrap().collect();
    outline.push(half_edge_between(&d, b0, b1));
    outline.push(half_edge_between(&d, b1, b2));
    let hint = d.locate(vector![0.5, 0.5]).unwrap().unwrap();

    let region = d.delete_interior(&outline, hint).unwrap();
    assert_eq!(d.num_faces(), 4);
    assert!((d.signed_area(region).unwrap() - 2.0).abs() < 1e-12);
    assert!(!d.inside(vector![1.5, 1.5], region).unwrap());
    assert!(d.inside(vector![0.5, 1.5], region).unwrap());
    d.validate().unwrap();
}

#[test]
fn validate_reports_corruption() {
    let mut d = square();
    let h = d.half_edge_ids().next().unwrap();
    let n = d.next(h).unwrap();
    let nn = d.next(n).unwrap();
    d.half_edges[h].next = nn;
    assert!(d.validate().is_err());

    let mut d = square();
    let v = vid(&d, 0);
    d.vertices[v].outgoing.clear();
    assert!(matches!(
        d.validate(),
        Err(InvariantError::IsolatedVertex(_))
    ));
}

#[test]
fn graph_view_lists_every_half_edge() {
    let d = square_with_diagonal();
    let view = d.graph();
    assert_eq!(view.vertices.len(), 4);
    assert_eq!(view.edges.len(), 10);
}
