mod epoch_adjusted;
mod exchange;
mod expand_collapse;
mod scale;
mod skyline_delta;
mod spr;
mod subtree_slide;
mod uniform;

pub use epoch_adjusted::EpochAdjusted;
pub use exchange::NarrowExchange;
pub use expand_collapse::ExpandCollapse;
pub use scale::TreeScale;
pub use skyline_delta::SkylineDelta;
pub use spr::SubtreePruneRegraft;
pub use subtree_slide::{AttachmentPoint, SubtreeSlide};
pub use uniform::UniformHeight;

#[allow(clippy::cast_precision_loss)]
fn ln_count(count: usize) -> f64 {
    (count as f64).ln()
}
