use crate::core::data::colour::Colour;

/// Maps an escape-time step count to a display colour.
pub trait ColourMap: Send + Sync {
    fn map(&self, steps: u32) -> Colour;

    fn display_name(&self) -> &str;
}
