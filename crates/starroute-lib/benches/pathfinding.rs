use criterion::{criterion_group, criterion_main, Criterion};
use starroute_lib::catalog::{
    Catalog, CatalogDocument, JumpPointKind, JumpPointRecord, JumpPointSize, SystemRecord,
    SystemSize, SystemStatus,
};
use starroute_lib::{CostModel, Priority, Route, RoutingSettings, Solver};

use std::hint::black_box;
use std::sync::Arc;

/// Square grid of systems with bidirectional links between neighbours.
fn grid_catalog(width: i64, height: i64) -> Arc<Catalog> {
    let mut systems = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let id = y * width + x + 1;
            let mut jump_points = Vec::new();
            let link = |jumps: &mut Vec<JumpPointRecord>, destination: i64| {
                jumps.push(JumpPointRecord {
                    name: None,
                    destination,
                    kind: JumpPointKind::Confirmed,
                    size: JumpPointSize::Medium,
                    entry_au: None,
                });
            };
            if x + 1 < width {
                link(&mut jump_points, id + 1);
            }
            if x > 0 {
                link(&mut jump_points, id - 1);
            }
            if y + 1 < height {
                link(&mut jump_points, id + width);
            }
            if y > 0 {
                link(&mut jump_points, id - width);
            }

            systems.push(SystemRecord {
                id,
                name: format!("Grid-{id}"),
                uuid: None,
                nickname: None,
                coordinates: [x as f64, y as f64, 0.0],
                faction: None,
                size: SystemSize::Medium,
                status: SystemStatus::Surveyed,
                is_off_limits: false,
                jump_points,
            });
        }
    }

    let document = CatalogDocument {
        factions: Vec::new(),
        systems,
    };
    Arc::new(Catalog::from_document(document).expect("grid catalog resolves"))
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let catalog = grid_catalog(20, 20);
    let corner = 20 * 20;

    c.bench_function("solve_grid_corner_to_corner", |b| {
        b.iter(|| {
            let mut solver = Solver::new(
                Arc::clone(&catalog),
                1,
                corner,
                RoutingSettings::default(),
                CostModel::default(),
            )
            .expect("solver constructs");
            solver.build(Priority::Time, false);
            black_box(solver.path().map(|path| path.len()))
        });
    });

    c.bench_function("solve_grid_cached_rebuild", |b| {
        let mut solver = Solver::new(
            Arc::clone(&catalog),
            1,
            corner,
            RoutingSettings::default(),
            CostModel::default(),
        )
        .expect("solver constructs");
        solver.build(Priority::Time, false);
        b.iter(|| {
            black_box(solver.build(Priority::Time, false));
        });
    });

    c.bench_function("route_with_waypoints", |b| {
        b.iter(|| {
            let route = Route::new(
                Arc::clone(&catalog),
                Some(1),
                &[20, corner],
                RoutingSettings::default(),
                CostModel::default(),
            );
            black_box(route.current_route().len())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
