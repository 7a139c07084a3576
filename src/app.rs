use crate::data::{MapDataset, PayloadError};
use crate::geo::CountryCode;
use crate::list::CardList;
use crate::map::surface::{self, RegionSurface};
use crate::map::{MapArtwork, MapView, RegionId, ZoomState};
use crate::tooltip::Tooltip;
use crate::ui;

/// Application state: the artwork surface, the member dataset, and the
/// interaction state the handlers mutate. Everything runs on the UI thread;
/// handlers are synchronous and run to completion.
pub struct App {
    pub artwork: MapArtwork,
    /// `None` when bootstrap failed or no payload was supplied; the map then
    /// draws but stays non-interactive.
    pub dataset: Option<MapDataset>,
    pub view: MapView,
    pub tooltip: Tooltip,
    pub cards: CardList,
    /// The single selected country, or none. Mutually exclusive by
    /// construction: selecting replaces, never stacks.
    pub selected: Option<CountryCode>,
    hovered: Option<RegionId>,
    /// Terminal-cell mouse position for the cursor marker.
    pub mouse_pos: Option<(u16, u16)>,
    pub should_quit: bool,
    width: u16,
    height: u16,
}

impl App {
    /// Build an inert app: artwork drawn, no dataset, no interactivity.
    pub fn new(mut artwork: MapArtwork, zoom: ZoomState, width: u16, height: u16) -> Self {
        let (px_width, px_height) = map_canvas_size(width, height);
        artwork.set_root_transform(zoom.attr());
        let view = MapView::new(artwork.bounds(), zoom, px_width, px_height);

        Self {
            artwork,
            dataset: None,
            view,
            tooltip: Tooltip::default(),
            cards: CardList::default(),
            selected: None,
            hovered: None,
            mouse_pos: None,
            should_quit: false,
            width,
            height,
        }
    }

    /// Parse the payload and wire the map up: mark active regions, build the
    /// card list, and arm the handlers. A parse failure aborts wiring
    /// entirely and leaves the app inert.
    pub fn load_payload(&mut self, raw_payload: &str) -> Result<(), PayloadError> {
        let dataset = MapDataset::parse(raw_payload)?;

        // Active means "has at least one member record"; the producer's
        // activeCountries list is filtered against the records so the two
        // can never disagree.
        let active: Vec<CountryCode> = dataset
            .active_countries()
            .iter()
            .copied()
            .filter(|&code| dataset.member_count(code) > 0)
            .collect();
        surface::mark_active(&mut self.artwork, &active);

        self.cards = CardList::from_dataset(&dataset);
        self.dataset = Some(dataset);
        Ok(())
    }

    pub fn bootstrap(
        artwork: MapArtwork,
        zoom: ZoomState,
        raw_payload: &str,
        width: u16,
        height: u16,
    ) -> Result<Self, PayloadError> {
        let mut app = Self::new(artwork, zoom, width, height);
        app.load_payload(raw_payload)?;
        Ok(app)
    }

    /// Update the view when the terminal resizes.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let (px_width, px_height) = map_canvas_size(width, height);
        self.view.resize(px_width, px_height);
    }

    /// Convert a terminal cell position to map canvas pixels, if it falls
    /// inside the map's drawable area.
    pub fn map_pixel_at(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let (px_width, px_height) = map_canvas_size(self.width, self.height);
        let inner_w = (px_width / 2) as u16;
        let inner_h = (px_height / 4) as u16;
        // One border cell on each side of the map block.
        if col < 1 || row < 1 || col >= 1 + inner_w || row >= 1 + inner_h {
            return None;
        }
        Some((((col - 1) as i32) * 2, ((row - 1) as i32) * 4))
    }

    /// Pointer movement over the terminal.
    pub fn pointer_moved(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        match self.map_pixel_at(col, row) {
            Some((px, py)) => self.pointer_at_map_px(px, py),
            None => self.pointer_left_map(),
        }
    }

    /// Pointer movement in map canvas pixels. Entering a region with country
    /// metadata shows the tooltip; moving repositions it; everything else
    /// hides it.
    pub fn pointer_at_map_px(&mut self, px: i32, py: i32) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let hit = self.artwork.hit(self.view.unproject(px, py));
        let country = hit.and_then(|id| self.artwork.country_of(id));

        match country {
            Some(code) => {
                if hit != self.hovered {
                    self.tooltip
                        .show(dataset.name(code), code, dataset.member_count(code));
                }
                self.tooltip.reposition(self.view.width as i32, (px, py));
            }
            None => self.tooltip.hide(),
        }
        self.hovered = hit;
    }

    /// Pointer left the map area entirely.
    pub fn pointer_left_map(&mut self) {
        self.tooltip.hide();
        self.hovered = None;
    }

    /// Left click on the terminal.
    pub fn mouse_click(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel_at(col, row) {
            self.click_at_map_px(px, py);
        }
    }

    /// Click in map canvas pixels: select the clicked country and filter the
    /// card list. No-op for regions without country metadata or countries
    /// without member records.
    pub fn click_at_map_px(&mut self, px: i32, py: i32) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let hit = self.artwork.hit(self.view.unproject(px, py));
        let Some(code) = hit.and_then(|id| self.artwork.country_of(id)) else {
            return;
        };
        if dataset.members(code).is_empty() {
            return;
        }

        surface::clear_selected(&mut self.artwork);
        surface::mark_selected(&mut self.artwork, code);
        self.selected = Some(code);
        self.cards.select_country(code);
    }

    /// Restore the unfiltered list and drop the map selection.
    pub fn show_all(&mut self) {
        surface::clear_selected(&mut self.artwork);
        self.selected = None;
        self.cards.show_all();
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom.zoom_in();
        self.artwork.set_root_transform(self.view.zoom.attr());
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom.zoom_out();
        self.artwork.set_root_transform(self.view.zoom.attr());
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Current zoom scale for the status bar.
    pub fn zoom_label(&self) -> String {
        format!("{:.2}x", self.view.zoom.scale)
    }

    /// Display name of the hovered country for the status bar.
    pub fn hovered_label(&self) -> Option<String> {
        let code = self.hovered.and_then(|id| self.artwork.country_of(id))?;
        let name = self
            .dataset
            .as_ref()
            .and_then(|d| d.name(code))
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string());
        Some(name)
    }
}

/// Map canvas size in braille pixels for a terminal of the given size:
/// the side list and the block border and status bar are subtracted first.
fn map_canvas_size(width: u16, height: u16) -> (usize, usize) {
    let inner_w = (width as usize)
        .saturating_sub(ui::LIST_WIDTH as usize)
        .saturating_sub(2);
    let inner_h = (height as usize).saturating_sub(3); // border + status bar
    (inner_w * 2, inner_h * 4)
}
