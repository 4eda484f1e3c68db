//! Magnetic field evaluators for Perseid particle propagation.
//!
//! Transport modules consume fields through the [`MagneticField`]
//! contract only: a pure function of position (and redshift), shared
//! through `Arc` so a single field instance can serve many concurrent
//! candidate-processing tasks for the lifetime of a run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use perseid_core::Vector3;

/// A magnetic field evaluator.
///
/// # Contract
///
/// - Pure function of position and redshift for the duration of one
///   propagation run; callable many times per candidate per step.
/// - Immutable after construction; safe to share across threads with
///   no locking.
/// - Must return a finite vector for any finite position. A zero
///   vector is a legal value (field-free region); transport modules
///   handle it without dividing by zero.
pub trait MagneticField: Send + Sync {
    /// Field value in tesla at `position` (meters) and redshift `z`.
    fn value(&self, position: &Vector3, z: f64) -> Vector3;
}

/// A homogeneous field: the same vector everywhere.
#[derive(Clone, Copy, Debug)]
pub struct UniformMagneticField {
    value: Vector3,
}

impl UniformMagneticField {
    /// Create a uniform field with the given value in tesla.
    pub fn new(value: Vector3) -> Self {
        Self { value }
    }
}

impl MagneticField for UniformMagneticField {
    fn value(&self, _position: &Vector3, _z: f64) -> Vector3 {
        self.value
    }
}

/// Superposition of several fields, evaluated as the vector sum.
///
/// Member fields are held by `Arc` so they can simultaneously be used
/// standalone; insertion order is kept but is irrelevant to the sum.
#[derive(Clone, Default)]
pub struct MagneticFieldList {
    fields: Vec<Arc<dyn MagneticField>>,
}

impl MagneticFieldList {
    /// Create an empty field list (evaluates to the zero vector).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the superposition.
    pub fn add(&mut self, field: Arc<dyn MagneticField>) {
        self.fields.push(field);
    }

    /// Number of member fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the list has no member fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl MagneticField for MagneticFieldList {
    fn value(&self, position: &Vector3, z: f64) -> Vector3 {
        let mut sum = Vector3::ZERO;
        for field in &self.fields {
            sum += field.value(position, z);
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perseid_core::units::NANOGAUSS;

    #[test]
    fn uniform_field_ignores_position() {
        let b = UniformMagneticField::new(Vector3::new(0.0, 0.0, 1.0 * NANOGAUSS));
        let at_origin = b.value(&Vector3::ZERO, 0.0);
        let far_away = b.value(&Vector3::new(1e20, -3e19, 7e18), 2.0);
        assert_eq!(at_origin, far_away);
    }

    #[test]
    fn empty_list_is_field_free() {
        let list = MagneticFieldList::new();
        assert!(list.is_empty());
        assert_eq!(list.value(&Vector3::new(1.0, 2.0, 3.0), 0.0), Vector3::ZERO);
    }

    #[test]
    fn list_sums_members() {
        let mut list = MagneticFieldList::new();
        list.add(Arc::new(UniformMagneticField::new(Vector3::new(
            1e-9, 0.0, 0.0,
        ))));
        list.add(Arc::new(UniformMagneticField::new(Vector3::new(
            0.0, 2e-9, 0.0,
        ))));
        assert_eq!(list.len(), 2);
        let v = list.value(&Vector3::ZERO, 0.0);
        assert_eq!(v, Vector3::new(1e-9, 2e-9, 0.0));
    }

    #[test]
    fn shared_member_outlives_list() {
        let member: Arc<dyn MagneticField> =
            Arc::new(UniformMagneticField::new(Vector3::new(0.0, 0.0, 1e-9)));
        {
            let mut list = MagneticFieldList::new();
            list.add(Arc::clone(&member));
            drop(list);
        }
        // the shared field is still usable after the list is gone
        assert_eq!(member.value(&Vector3::ZERO, 0.0).z, 1e-9);
    }
}
