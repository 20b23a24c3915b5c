pub mod usage;

/// Sections of a page take over key handling while they are active
pub trait SectionActivation {
    fn activate(&mut self);
    fn deactivate(&mut self);
}
