//! Benchmark MbICP scan matching performance.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::f64::consts::PI;
use std::hint::black_box;

use mbicp::config::ScaledParams;
use mbicp::matching::{CorrespondenceSearch, PreparedReference, project_scan};
use mbicp::{MbIcpConfig, MbIcpMatcher, Pose2D, RangeScan};

/// Create a scan of a rectangular room from a sensor pose.
fn room_scan(
    room_width: f64,
    room_height: f64,
    pose: Pose2D,
    num_points: usize,
    fov: f64,
) -> RangeScan {
    let angle_increment = fov / (num_points - 1) as f64;
    let max_range = (room_width * room_width + room_height * room_height).sqrt();

    let mut ranges = Vec::with_capacity(num_points);
    let mut bearings = Vec::with_capacity(num_points);

    for i in 0..num_points {
        let bearing = i as f64 * angle_increment - fov / 2.0;
        bearings.push(bearing);

        let (sin_a, cos_a) = (pose.theta + bearing).sin_cos();
        let mut range = max_range;

        // Right and left walls
        for wall_x in [room_width, 0.0] {
            if cos_a.abs() > 1e-12 {
                let t = (wall_x - pose.x) / cos_a;
                let y = pose.y + t * sin_a;
                if t > 0.0 && t < range && (0.0..=room_height).contains(&y) {
                    range = t;
                }
            }
        }
        // Top and bottom walls
        for wall_y in [room_height, 0.0] {
            if sin_a.abs() > 1e-12 {
                let t = (wall_y - pose.y) / sin_a;
                let x = pose.x + t * cos_a;
                if t > 0.0 && t < range && (0.0..=room_width).contains(&x) {
                    range = t;
                }
            }
        }

        ranges.push(range);
    }

    RangeScan::from_ranges(&ranges, &bearings)
}

fn bench_match(c: &mut Criterion) {
    let reference = room_scan(6.0, 4.0, Pose2D::new(2.5, 1.8, 0.0), 271, 1.5 * PI);
    let current = room_scan(6.0, 4.0, Pose2D::new(2.55, 1.82, 0.01), 271, 1.5 * PI);
    let matcher = MbIcpMatcher::new(MbIcpConfig::default());

    c.bench_function("mbicp_match_271pts", |b| {
        b.iter(|| {
            let result = matcher.match_scans(
                black_box(&reference),
                black_box(&current),
                black_box(Pose2D::identity()),
            );
            black_box(result)
        })
    });
}

fn bench_correspondence_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("correspondence_search");
    let config = MbIcpConfig::default();
    let params = ScaledParams::new(&config, 1.0);
    let search = CorrespondenceSearch::new(&params, config.angular_window);

    for num_points in [181, 271, 541].iter() {
        let reference = room_scan(6.0, 4.0, Pose2D::new(2.5, 1.8, 0.0), *num_points, 1.5 * PI);
        let current = room_scan(6.0, 4.0, Pose2D::new(2.55, 1.82, 0.01), *num_points, 1.5 * PI);

        let prepared = PreparedReference::new(project_scan(
            &reference,
            Pose2D::identity(),
            params.max_laser_range,
        ));
        let points = project_scan(&current, Pose2D::identity(), params.max_laser_range);

        group.bench_with_input(
            BenchmarkId::from_parameter(num_points),
            num_points,
            |b, _| b.iter(|| black_box(search.search(black_box(&prepared), black_box(&points)))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_match, bench_correspondence_search);
criterion_main!(benches);
