//! Grid town construction
//!
//! Host-side helpers for building the road networks the simulator runs on.
//! All randomness comes from the generator the caller passes in.

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::road_network::SimRoadNetwork;
use super::types::{IntersectionId, Weight};

/// Builds a `width` x `height` grid with a two-way road between every pair of
/// horizontally or vertically adjacent intersections
pub fn build_grid(width: u32, height: u32, weight: Weight) -> Result<SimRoadNetwork> {
    let width = i32::try_from(width).context("Grid width too large")?;
    let height = i32::try_from(height).context("Grid height too large")?;

    let mut network = SimRoadNetwork::new();
    for x in 0..width {
        for y in 0..height {
            network.add_intersection(IntersectionId::new(x, y));
        }
    }

    for x in 0..width {
        for y in 0..height {
            let here = IntersectionId::new(x, y);
            if x + 1 < width {
                network
                    .add_two_way_road(here, IntersectionId::new(x + 1, y), weight)
                    .with_context(|| format!("Failed to connect {} eastwards", here))?;
            }
            if y + 1 < height {
                network
                    .add_two_way_road(here, IntersectionId::new(x, y + 1), weight)
                    .with_context(|| format!("Failed to connect {} southwards", here))?;
            }
        }
    }

    Ok(network)
}

/// A road whose weight was raised to simulate traffic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Congestion {
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub weight: Weight,
}

/// Raises the weight of `count` randomly picked roads to a value drawn from
/// `min_weight..max_weight`
pub fn add_random_congestion<R>(
    network: &mut SimRoadNetwork,
    rng: &mut R,
    count: usize,
    min_weight: Weight,
    max_weight: Weight,
) -> Result<Vec<Congestion>>
where
    R: Rng + ?Sized,
{
    anyhow::ensure!(
        min_weight < max_weight,
        "Congestion weight range {}..{} is empty",
        min_weight,
        max_weight
    );

    let intersections = network.intersections();
    let mut congestion = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(&from) = intersections.choose(rng) else {
            break;
        };
        let neighbors = network.neighbors(from)?;
        let Some(&(to, _)) = neighbors.choose(rng) else {
            continue;
        };

        let weight = rng.random_range(min_weight..max_weight);
        network
            .set_weight(from, to, weight)
            .with_context(|| format!("Failed to congest road {} -> {}", from, to))?;
        congestion.push(Congestion { from, to, weight });
    }

    Ok(congestion)
}

/// Picks a random start and a distinct random goal on the grid
pub fn random_trip<R>(rng: &mut R, width: u32, height: u32) -> Result<(IntersectionId, IntersectionId)>
where
    R: Rng + ?Sized,
{
    anyhow::ensure!(
        u64::from(width) * u64::from(height) >= 2,
        "Grid needs at least two intersections for a trip"
    );
    let width = i32::try_from(width).context("Grid width too large")?;
    let height = i32::try_from(height).context("Grid height too large")?;

    let pick = |rng: &mut R| IntersectionId::new(rng.random_range(0..width), rng.random_range(0..height));

    let start = pick(&mut *rng);
    let mut goal = pick(&mut *rng);
    while goal == start {
        goal = pick(&mut *rng);
    }
    Ok((start, goal))
}
