//! Snapshotting the open negotiation view.

use reroll_events::CapturedOffer;

use crate::ports::WorldProbe;

/// Reads offers out of the currently open negotiation view.
pub struct TradeCapture;

impl TradeCapture {
    /// Ordered, immutable offers of the open view.
    ///
    /// Empty when no view is open or the offer list cannot be read; the
    /// latter is logged as a warning.
    pub fn capture<P: WorldProbe + ?Sized>(probe: &P) -> Vec<CapturedOffer> {
        if probe.open_view().is_none() {
            return Vec::new();
        }

        match probe.view_offers() {
            Ok(listings) => {
                let offers: Vec<CapturedOffer> = listings
                    .iter()
                    .enumerate()
                    .map(|(slot, listing)| CapturedOffer::from_listing(slot, listing))
                    .collect();
                for offer in &offers {
                    tracing::debug!("  offer {}", offer);
                }
                offers
            }
            Err(err) => {
                tracing::warn!("Failed to capture offers: {}", err);
                Vec::new()
            }
        }
    }
}
