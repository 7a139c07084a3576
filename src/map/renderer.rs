use crate::braille::BrailleCanvas;
use crate::map::artwork::{MapArtwork, Region};
use crate::map::geometry::{draw_line, draw_thick_line, fill_polygon};
use crate::map::surface::class;
use crate::map::transform::MapView;

/// Braille layers composited back-to-front with distinct colors by the UI.
pub struct MapLayers {
    /// Every region outline.
    pub outlines: BrailleCanvas,
    /// Filled regions carrying the `active` marker.
    pub active: BrailleCanvas,
    /// Filled regions carrying the `selected` marker, thick outline.
    pub selected: BrailleCanvas,
}

/// Rasterize the region surface at the view's current size and zoom.
pub fn render(artwork: &MapArtwork, view: &MapView) -> MapLayers {
    let (outlines, (active, selected)) = rayon::join(
        || render_outlines(artwork, view),
        || {
            rayon::join(
                || render_class_layer(artwork, view, class::ACTIVE, false),
                || render_class_layer(artwork, view, class::SELECTED, true),
            )
        },
    );

    MapLayers {
        outlines,
        active,
        selected,
    }
}

fn new_canvas(view: &MapView) -> BrailleCanvas {
    BrailleCanvas::new(view.width.div_ceil(2), view.height.div_ceil(4))
}

fn render_outlines(artwork: &MapArtwork, view: &MapView) -> BrailleCanvas {
    let mut canvas = new_canvas(view);
    for region in artwork.regions() {
        draw_region_outline(&mut canvas, region, view, false);
    }
    canvas
}

fn render_class_layer(
    artwork: &MapArtwork,
    view: &MapView,
    class: &str,
    thick: bool,
) -> BrailleCanvas {
    let mut canvas = new_canvas(view);
    for region in artwork.regions() {
        if !region.has_class(class) {
            continue;
        }
        fill_region(&mut canvas, region, view);
        draw_region_outline(&mut canvas, region, view, thick);
    }
    canvas
}

fn draw_region_outline(canvas: &mut BrailleCanvas, region: &Region, view: &MapView, thick: bool) {
    for ring in region.rings() {
        if ring.len() < 2 {
            continue;
        }

        let mut prev: Option<(i32, i32)> = None;
        for i in 0..=ring.len() {
            let (px, py) = view.project(ring[i % ring.len()]);

            if let Some((prev_x, prev_y)) = prev {
                let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
                if dist < view.width && segment_might_be_visible(view, (prev_x, prev_y), (px, py)) {
                    if thick {
                        draw_thick_line(canvas, prev_x, prev_y, px, py);
                    } else {
                        draw_line(canvas, prev_x, prev_y, px, py);
                    }
                }
            }

            prev = Some((px, py));
        }
    }
}

fn fill_region(canvas: &mut BrailleCanvas, region: &Region, view: &MapView) {
    let projected: Vec<Vec<(i32, i32)>> = region
        .rings()
        .iter()
        .map(|ring| ring.iter().map(|&p| view.project(p)).collect())
        .collect();
    fill_polygon(canvas, &projected);
}

/// Rough bounding box check against the canvas.
fn segment_might_be_visible(view: &MapView, p1: (i32, i32), p2: (i32, i32)) -> bool {
    let min_x = p1.0.min(p2.0);
    let max_x = p1.0.max(p2.0);
    let min_y = p1.1.min(p2.1);
    let max_y = p1.1.max(p2.1);

    max_x >= 0 && min_x < view.width as i32 && max_y >= 0 && min_y < view.height as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::CountryCode;
    use crate::map::surface::{mark_active, mark_selected};
    use crate::map::transform::ZoomState;

    fn view_for(artwork: &MapArtwork) -> MapView {
        MapView::new(artwork.bounds(), ZoomState::new(1.0, 0.0, 0.0), 160, 80)
    }

    #[test]
    fn outlines_draw_without_any_dataset() {
        let artwork = MapArtwork::simple_europe();
        let layers = render(&artwork, &view_for(&artwork));
        assert!(!layers.outlines.is_blank());
        assert!(layers.active.is_blank());
        assert!(layers.selected.is_blank());
    }

    #[test]
    fn class_layers_follow_markers() {
        let mut artwork = MapArtwork::simple_europe();
        let fr = CountryCode::parse("FR").expect("valid code");
        mark_active(&mut artwork, &[fr]);
        let layers = render(&artwork, &view_for(&artwork));
        assert!(!layers.active.is_blank());
        assert!(layers.selected.is_blank());

        mark_selected(&mut artwork, fr);
        let layers = render(&artwork, &view_for(&artwork));
        assert!(!layers.selected.is_blank());
    }
}
