//! League business logic: court allocation, sit-outs, round generation, scoring, standings, seasons.

mod courts;
mod rankings;
mod rounds;
mod scoring;
mod season;
mod sit_out;

pub use courts::active_courts;
pub use rankings::{compute_rankings, RankingEntry};
pub use rounds::{assign_greedy, assign_random, PairingHistory, PartialAssignment, MAX_GREEDY_ATTEMPTS};
pub use season::{plan_promotion_relegation, seeding_split, MIN_SWAP_TIER_SIZE, SWAP_COUNT};
pub use sit_out::{select_sit_outs, sit_out_score};
