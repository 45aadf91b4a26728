use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;

    /// First eight characters of the identifier, enough to address an entity
    /// from the shell.
    fn short_id(&self) -> String {
        self.id().simple().to_string()[..8].to_string()
    }
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
