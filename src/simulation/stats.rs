//! Simulation statistics

use log::info;

/// Running totals kept by the simulator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub total_vehicles_spawned: u32,
    pub total_vehicles_arrived: u32,
    /// Vehicles whose goal was unreachable
    pub parked_vehicles: u32,
    /// Vehicles still travelling
    pub active_vehicles: u32,
    /// Sum over all vehicles of ticks spent held at a signal
    pub total_ticks_waiting: u64,
    pub ticks_run: u64,
    pub total_intersections: u32,
    pub total_roads: u32,
}

impl SimulationStats {
    /// Share of spawned vehicles that reached their goal, in percent
    pub fn success_rate(&self) -> f32 {
        if self.total_vehicles_spawned > 0 {
            (self.total_vehicles_arrived as f32 / self.total_vehicles_spawned as f32) * 100.0
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Ticks run: {}", self.ticks_run);
        info!("Total vehicles spawned: {}", self.total_vehicles_spawned);
        info!("Total vehicles arrived: {}", self.total_vehicles_arrived);
        info!("Parked vehicles: {}", self.parked_vehicles);
        info!("Active vehicles: {}", self.active_vehicles);
        info!("Total ticks waiting at signals: {}", self.total_ticks_waiting);
        info!("Total intersections: {}", self.total_intersections);
        info!("Total roads: {}", self.total_roads);
        info!("Success rate: {:.1}%", self.success_rate());
    }
}
