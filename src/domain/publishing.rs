use chrono::{DateTime, Utc};

/// Content with a publish flag that gates public visibility.
pub trait Publishable {
    fn is_published(&self) -> bool;

    /// Sets the flag. Implementations may stamp extra fields on the
    /// unpublished → published transition.
    fn set_published(&mut self, published: bool, now: DateTime<Utc>);

    /// Flips the flag and returns the new value.
    fn toggle_published(&mut self, now: DateTime<Utc>) -> bool {
        let next = !self.is_published();
        self.set_published(next, now);
        next
    }
}

/// Implements [`Publishable`] for entities with a plain `published: bool` field.
macro_rules! impl_publishable {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl $crate::publishing::Publishable for $entity {
                fn is_published(&self) -> bool {
                    self.published
                }

                fn set_published(&mut self, published: bool, _now: chrono::DateTime<chrono::Utc>) {
                    self.published = published;
                }
            }
        )+
    };
}

pub(crate) use impl_publishable;
