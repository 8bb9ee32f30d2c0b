//! Factory results: either an instance assigned to a definition, or a fresh one.

use std::fmt;
use std::ops::Deref;

/// Clone a boxed trait object.
pub trait CloneBoxed {
    fn clone_boxed(&self) -> Box<Self>;
}

/// A value converter or configuration provider returned by an editor factory.
///
/// `Assigned` borrows the instance owned by the editor definition, so
/// repeated calls yield the same object. `Created` owns a freshly built
/// instance that nothing else can observe.
pub enum Instance<'a, T: ?Sized> {
    Assigned(&'a T),
    Created(Box<T>),
}

impl<'a, T: ?Sized> Instance<'a, T> {
    /// Whether this is the instance assigned to the definition.
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// Whether both point at the same object.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        std::ptr::addr_eq(&**this as *const T, &**other as *const T)
    }
}

impl<'a, T: ?Sized + CloneBoxed> Instance<'a, T> {
    /// Mutable access. An assigned instance is cloned first; the
    /// definition's copy is never modified.
    pub fn to_mut(&mut self) -> &mut T {
        if let Self::Assigned(assigned) = *self {
            *self = Self::Created(assigned.clone_boxed());
        }
        match self {
            Self::Created(owned) => owned,
            Self::Assigned(_) => unreachable!("assigned instance was just replaced"),
        }
    }

    /// Take ownership, cloning an assigned instance.
    pub fn into_owned(self) -> Box<T> {
        match self {
            Self::Assigned(assigned) => assigned.clone_boxed(),
            Self::Created(owned) => owned,
        }
    }
}

impl<T: ?Sized> Deref for Instance<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Self::Assigned(assigned) => assigned,
            Self::Created(owned) => owned,
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Instance<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned(assigned) => f.debug_tuple("Assigned").field(assigned).finish(),
            Self::Created(owned) => f.debug_tuple("Created").field(owned).finish(),
        }
    }
}
