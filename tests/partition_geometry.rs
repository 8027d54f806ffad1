use paperfold::fold::{FoldEngine, FoldOutcome, FoldType};
use paperfold::math::Point;
use paperfold::shape::Panel;

fn square_sheet() -> FoldEngine {
    let mut engine = FoldEngine::new();
    engine.push_panel(Panel::new(
        Point::new(0.0, 0.0, 0.0),
        Point::new(2.0, 0.0, 0.0),
        Point::new(2.0, 2.0, 0.0),
    ));
    engine.push_panel(Panel::new(
        Point::new(0.0, 0.0, 0.0),
        Point::new(2.0, 2.0, 0.0),
        Point::new(0.0, 2.0, 0.0),
    ));
    engine
}

fn total_double_area(engine: &FoldEngine) -> f64 {
    engine
        .sheet()
        .panels()
        .iter()
        .map(|p| p.double_signed_area_xy().abs())
        .sum()
}

#[test]
fn interior_line_preserves_total_area() {
    let mut engine = square_sheet();
    let outcome = engine
        .initialize_fold(
            Point::new(0.5, -1.0, 0.0),
            Point::new(1.5, 3.0, 0.0),
            FoldType::Mountain,
        )
        .unwrap();
    assert_eq!(outcome, FoldOutcome::Folding);
    assert!((total_double_area(&engine) - 8.0).abs() < 1.0e-3);
}

#[test]
fn split_panels_keep_positive_area() {
    let mut engine = square_sheet();
    engine
        .initialize_fold(
            Point::new(1.3, -1.0, 0.0),
            Point::new(0.7, 3.0, 0.0),
            FoldType::Mountain,
        )
        .unwrap();
    for panel in engine.sheet().panels() {
        assert!(panel.double_signed_area_xy().abs() > 0.0);
    }
}

#[test]
fn random_crossing_lines_partition_cleanly() {
    let mut rng = oorandom::Rand32::new(42);
    for _ in 0..200 {
        let x1 = 0.2 + 1.6 * rng.rand_float();
        let x2 = 0.2 + 1.6 * rng.rand_float();

        let mut engine = square_sheet();
        let outcome = engine
            .initialize_fold(
                Point::new(x1, -0.5, 0.0),
                Point::new(x2, 2.5, 0.0),
                FoldType::Mountain,
            )
            .unwrap();
        // The line always crosses the square's interior, so the paper on
        // its left must fold.
        assert_eq!(outcome, FoldOutcome::Folding);

        // Splitting never creates or destroys paper.
        assert!((total_double_area(&engine) - 8.0).abs() < 1.0e-2);

        engine.advance(1.0);
        engine.advance(core::f32::consts::PI);
        engine.finalize();
        for panel in engine.sheet().panels() {
            for v in panel.vertices() {
                assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
            }
        }
    }
}
