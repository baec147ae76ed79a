use egui::Pos2;

use crate::element::{ConnectorEnd, DrawableObject, Element, ObjectId};
use crate::error::CommandError;
use crate::geometry::resolve_binding;

/// Ordered collection of drawable objects. Order is z-order: later objects are
/// drawn on top and hit-tested first.
///
/// Reading is public; every mutation is crate-private and reached only through
/// [`crate::command::Command`], so undo history can never be bypassed.
#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: Vec<DrawableObject>,
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from already loaded objects
    pub fn from_objects(objects: Vec<DrawableObject>) -> Self {
        let mut document = Self { objects, version: 0 };
        document.refresh_connectors();
        document
    }

    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Incremented by every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Connectors with at least one end bound to `host`
    pub fn connectors_attached_to(&self, host: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter_map(DrawableObject::as_connector)
            .filter(|connector| connector.is_attached_to(host))
            .map(Element::id)
            .collect()
    }

    pub(crate) fn insert(&mut self, index: usize, object: DrawableObject) -> Result<(), CommandError> {
        if self.contains(object.id()) {
            return Err(CommandError::DuplicateObject(object.id()));
        }
        if index > self.objects.len() {
            return Err(CommandError::IndexOutOfBounds {
                index,
                len: self.objects.len(),
            });
        }
        self.objects.insert(index, object);
        self.touch();
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> Result<(usize, DrawableObject), CommandError> {
        let index = self.index_of(id).ok_or(CommandError::ObjectNotFound(id))?;
        let object = self.objects.remove(index);
        self.touch();
        Ok((index, object))
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Result<&mut DrawableObject, CommandError> {
        self.touch();
        self.objects
            .iter_mut()
            .find(|object| object.id() == id)
            .ok_or(CommandError::ObjectNotFound(id))
    }

    /// Swap in a new version of an existing object, returning the old one
    pub(crate) fn replace(&mut self, object: DrawableObject) -> Result<DrawableObject, CommandError> {
        let slot = self.get_mut(object.id())?;
        Ok(std::mem::replace(slot, object))
    }

    /// Re-run attachment for every bound connector end so connectors track
    /// their hosts. Ends whose host is gone keep their last position.
    pub(crate) fn refresh_connectors(&mut self) {
        let updates: Vec<(usize, Pos2, Pos2)> = self
            .objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                let connector = object.as_connector()?;
                Some((
                    index,
                    self.resolve_end(&connector.source),
                    self.resolve_end(&connector.target),
                ))
            })
            .collect();

        for (index, source, target) in updates {
            if let Some(connector) = self.objects[index].as_connector_mut() {
                connector.set_end_points(source, target);
            }
        }
    }

    fn resolve_end(&self, end: &ConnectorEnd) -> Pos2 {
        end.binding
            .and_then(|binding| {
                self.get(binding.host)
                    .filter(|host| !host.is_connector())
                    .map(|host| resolve_binding(host, &binding))
            })
            .unwrap_or(end.point)
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}
