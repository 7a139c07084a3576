use crate::data::{MapDataset, MemberRecord};
use crate::geo::CountryCode;
use crate::map::class;

/// One country card in the side list. `filtered` and `highlighted` mirror
/// the marker classes of the original markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryCard {
    pub code: CountryCode,
    pub name: String,
    pub members: Vec<MemberRecord>,
    pub filtered: bool,
    pub highlighted: bool,
}

impl CountryCard {
    /// Marker classes this card currently carries.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.filtered {
            classes.push(class::FILTERED);
        }
        if self.highlighted {
            classes.push(class::HIGHLIGHTED);
        }
        classes
    }
}

/// The member-country list beside the map: one card per country with at
/// least one member, code-ordered, plus the show-all control.
#[derive(Default)]
pub struct CardList {
    cards: Vec<CountryCard>,
    /// The show-all control carries `hidden` until a filter is active.
    show_all_hidden: bool,
    /// Card index to bring into the viewport center, if a selection was
    /// just made.
    scroll_target: Option<usize>,
}

impl CardList {
    pub fn from_dataset(dataset: &MapDataset) -> Self {
        let cards = dataset
            .member_countries()
            .map(|(code, name, members)| CountryCard {
                code,
                name,
                members: members.to_vec(),
                filtered: false,
                highlighted: false,
            })
            .collect();
        Self {
            cards,
            show_all_hidden: true,
            scroll_target: None,
        }
    }

    /// Filter the list down to one country: every other card is filtered
    /// out, the matching card is highlighted and scrolled to, and the
    /// show-all control is revealed. No-op when no card matches (countries
    /// without members have no card).
    pub fn select_country(&mut self, code: CountryCode) {
        let Some(target) = self.cards.iter().position(|card| card.code == code) else {
            return;
        };

        for (idx, card) in self.cards.iter_mut().enumerate() {
            if idx == target {
                card.filtered = false;
                card.highlighted = true;
            } else {
                card.filtered = true;
                card.highlighted = false;
            }
        }
        self.show_all_hidden = false;
        self.scroll_target = Some(target);
    }

    /// Drop all filter and highlight markers and hide the show-all control.
    pub fn show_all(&mut self) {
        for card in &mut self.cards {
            card.filtered = false;
            card.highlighted = false;
        }
        self.show_all_hidden = true;
        self.scroll_target = None;
    }

    pub fn cards(&self) -> &[CountryCard] {
        &self.cards
    }

    pub fn show_all_visible(&self) -> bool {
        !self.show_all_hidden
    }

    pub fn scroll_target(&self) -> Option<usize> {
        self.scroll_target
    }
}

/// Scroll offset placing a card in the viewport center, clamped so the list
/// never scrolls past its end.
pub fn centered_scroll(
    card_top: usize,
    card_height: usize,
    viewport_height: usize,
    total_height: usize,
) -> usize {
    let lead = viewport_height.saturating_sub(card_height) / 2;
    let offset = card_top.saturating_sub(lead);
    offset.min(total_height.saturating_sub(viewport_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MapDataset;

    fn code(raw: &str) -> CountryCode {
        CountryCode::parse(raw).expect("valid test code")
    }

    fn list() -> CardList {
        let payload = r#"{
            "membersByCountry": {
                "FR": [{"title": "Org A", "url": "/a"}],
                "NL": [{"title": "Org B", "url": "/b"}, {"title": "Org C", "url": "/c"}],
                "DE": []
            },
            "countryNames": {"FR": "France", "NL": "Netherlands", "DE": "Germany"}
        }"#;
        let dataset = MapDataset::parse(payload).expect("valid payload");
        CardList::from_dataset(&dataset)
    }

    #[test]
    fn builds_code_ordered_cards_for_member_countries_only() {
        let cards = list();
        let codes: Vec<_> = cards.cards().iter().map(|c| c.code).collect();
        // DE has zero members: no card.
        assert_eq!(codes, vec![code("FR"), code("NL")]);
        assert!(!cards.show_all_visible());
    }

    #[test]
    fn select_filters_all_but_the_match() {
        let mut cards = list();
        cards.select_country(code("NL"));

        let fr = &cards.cards()[0];
        let nl = &cards.cards()[1];
        assert!(fr.filtered && !fr.highlighted);
        assert!(!nl.filtered && nl.highlighted);
        assert_eq!(nl.classes(), vec![class::HIGHLIGHTED]);
        assert!(cards.show_all_visible());
        assert_eq!(cards.scroll_target(), Some(1));
    }

    #[test]
    fn select_then_show_all_restores_marker_state() {
        let mut cards = list();
        let before: Vec<_> = cards.cards().to_vec();

        cards.select_country(code("FR"));
        cards.show_all();

        assert_eq!(cards.cards(), before.as_slice());
        assert!(!cards.show_all_visible());
        assert_eq!(cards.scroll_target(), None);
    }

    #[test]
    fn selecting_memberless_or_unknown_country_is_a_no_op() {
        let mut cards = list();
        let before: Vec<_> = cards.cards().to_vec();

        cards.select_country(code("DE")); // zero members, no card
        cards.select_country(code("ZZ")); // unknown

        assert_eq!(cards.cards(), before.as_slice());
        assert!(!cards.show_all_visible());
        assert_eq!(cards.scroll_target(), None);
    }

    #[test]
    fn reselecting_moves_the_highlight() {
        let mut cards = list();
        cards.select_country(code("FR"));
        cards.select_country(code("NL"));
        assert!(!cards.cards()[0].highlighted);
        assert!(cards.cards()[1].highlighted);
        // Exactly one highlighted card at any time.
        let highlighted = cards.cards().iter().filter(|c| c.highlighted).count();
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn centered_scroll_clamps_to_list_bounds() {
        // Card near the top: no scrolling needed.
        assert_eq!(centered_scroll(2, 4, 20, 60), 0);
        // Card in the middle lands centered.
        assert_eq!(centered_scroll(30, 4, 20, 60), 22);
        // Card at the end: clamp to the last page.
        assert_eq!(centered_scroll(58, 4, 20, 60), 40);
    }
}
