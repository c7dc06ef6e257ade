use tilefall_core::RoundSession;
use tilefall_ports::types::PointerPoint;

/// Taps every unhit tile once its leading edge has entered the hit zone.
#[derive(Debug, Default)]
pub struct Autoplay {
    taps: u32,
}

impl Autoplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taps(&self) -> u32 {
        self.taps
    }

    pub fn points(&mut self, session: &RoundSession) -> Vec<PointerPoint> {
        let geometry = session.config().geometry;
        let zone_top = geometry.hit_zone_top();
        let floor = geometry.playfield.height;

        let points: Vec<_> = session
            .tiles()
            .iter()
            .filter(|tile| !tile.hit && tile.leading_edge() >= zone_top && tile.y <= floor)
            .map(|tile| {
                let x = geometry.lane_left(tile.lane) + geometry.lane_width() / 2.0;
                let top = tile.y.max(zone_top);
                let bottom = tile.leading_edge().min(floor);
                PointerPoint::new(x, (top + bottom) / 2.0)
            })
            .collect();
        self.taps += points.len() as u32;
        points
    }
}
