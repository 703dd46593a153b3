//! Scene registry: the object table and the light list.

use crate::light::Light;
use crate::object::{Object, ObjectId};

#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object and returns its handle for later pose updates.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0)
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    /// Total number of primitives across all objects.
    pub fn primitive_count(&self) -> usize {
        self.objects.iter().map(|o| o.primitives().len()).sum()
    }
}
