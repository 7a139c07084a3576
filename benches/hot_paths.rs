use criterion::{black_box, criterion_group, criterion_main, Criterion};
use member_map::geo::CountryCode;
use member_map::map::surface::{mark_active, mark_selected};
use member_map::map::{renderer, MapArtwork, MapView, ZoomState};

fn marked_artwork() -> MapArtwork {
    let mut artwork = MapArtwork::simple_europe();
    let active: Vec<CountryCode> = ["FR", "DE", "IT", "ES", "SE"]
        .iter()
        .filter_map(|raw| CountryCode::parse(raw))
        .collect();
    mark_active(&mut artwork, &active);
    mark_selected(&mut artwork, active[0]);
    artwork
}

fn bench_hit_testing(c: &mut Criterion) {
    let artwork = MapArtwork::simple_europe();
    let view = MapView::new(artwork.bounds(), ZoomState::baseline(), 320, 160);

    c.bench_function("hit_test_sweep", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for py in (0..160).step_by(4) {
                for px in (0..320).step_by(4) {
                    if artwork.hit(view.unproject(px, py)).is_some() {
                        hits += 1;
                    }
                }
            }
            black_box(hits)
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let artwork = marked_artwork();
    let view = MapView::new(artwork.bounds(), ZoomState::baseline(), 320, 160);

    c.bench_function("render_layers", |b| {
        b.iter(|| black_box(renderer::render(&artwork, &view)))
    });

    let mut zoomed = ZoomState::baseline();
    for _ in 0..5 {
        zoomed.zoom_in();
    }
    let zoomed_view = MapView::new(artwork.bounds(), zoomed, 320, 160);

    c.bench_function("render_layers_zoomed", |b| {
        b.iter(|| black_box(renderer::render(&artwork, &zoomed_view)))
    });
}

criterion_group!(benches, bench_hit_testing, bench_render);
criterion_main!(benches);
