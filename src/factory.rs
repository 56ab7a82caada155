//! Lifecycle contract implemented by pooled resource types

use crate::errors::FactoryError;
use crate::instance::PooledInstance;

/// Creates, checks and tears down the objects held by a pool.
///
/// The pool only ever talks to its resources through this trait. Every
/// callback may fail; the pool treats a failure as "this instance cannot be
/// used" and destroys it, never as a fatal pool error.
///
/// `activate_object` and `passivate_object` are paired: whatever one sets
/// up, the other must undo, or instances will drift between borrows.
///
/// # Examples
///
/// ```
/// use lifepool::{FactoryError, PooledInstance, PooledObjectFactory};
///
/// struct Buffers;
///
/// impl PooledObjectFactory<Vec<u8>> for Buffers {
///     fn make_object(&self) -> Result<Vec<u8>, FactoryError> {
///         Ok(Vec::with_capacity(4096))
///     }
///
///     fn passivate_object(&self, obj: &mut PooledInstance<Vec<u8>>) -> Result<(), FactoryError> {
///         obj.value_mut().clear();
///         Ok(())
///     }
/// }
/// ```
pub trait PooledObjectFactory<T>: Send + Sync {
    /// Create a new resource.
    fn make_object(&self) -> Result<T, FactoryError>;

    /// End the life of an instance: threads must exit, sockets must close,
    /// streams must flush. Called when validation fails, when the evictor
    /// culls an idle instance, and on shutdown.
    fn destroy_object(&self, obj: PooledInstance<T>) -> Result<(), FactoryError> {
        drop(obj);
        Ok(())
    }

    /// Whether the instance is still fit to hand out.
    fn validate_object(&self, _obj: &PooledInstance<T>) -> bool {
        true
    }

    /// Prepare an instance for a borrower, e.g. reset it so it looks freshly made.
    fn activate_object(&self, _obj: &mut PooledInstance<T>) -> Result<(), FactoryError> {
        Ok(())
    }

    /// Wind an instance down after it comes back, e.g. clear buffers.
    fn passivate_object(&self, _obj: &mut PooledInstance<T>) -> Result<(), FactoryError> {
        Ok(())
    }
}

type MakeFn<T> = Box<dyn Fn() -> Result<T, FactoryError> + Send + Sync>;
type CheckFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type HookFn<T> = Box<dyn Fn(&mut T) -> Result<(), FactoryError> + Send + Sync>;
type DestroyFn<T> = Box<dyn Fn(T) -> Result<(), FactoryError> + Send + Sync>;

/// Closure-backed factory for resources that need no dedicated type
///
/// # Examples
///
/// ```
/// use lifepool::{FnFactory, ObjectPool, PoolConfiguration};
///
/// let factory = FnFactory::new(|| Ok(String::with_capacity(64)))
///     .with_passivate(|s: &mut String| {
///         s.clear();
///         Ok(())
///     });
///
/// let pool = ObjectPool::new(factory, PoolConfiguration::default()).unwrap();
/// let mut s = pool.borrow_object().unwrap();
/// s.push_str("hello");
/// ```
pub struct FnFactory<T> {
    make: MakeFn<T>,
    validate: Option<CheckFn<T>>,
    activate: Option<HookFn<T>>,
    passivate: Option<HookFn<T>>,
    destroy: Option<DestroyFn<T>>,
}

impl<T> FnFactory<T> {
    pub fn new<F>(make: F) -> Self
    where
        F: Fn() -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        Self {
            make: Box::new(make),
            validate: None,
            activate: None,
            passivate: None,
            destroy: None,
        }
    }

    pub fn with_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Box::new(f));
        self
    }

    pub fn with_activate<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut T) -> Result<(), FactoryError> + Send + Sync + 'static,
    {
        self.activate = Some(Box::new(f));
        self
    }

    pub fn with_passivate<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut T) -> Result<(), FactoryError> + Send + Sync + 'static,
    {
        self.passivate = Some(Box::new(f));
        self
    }

    pub fn with_destroy<F>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Result<(), FactoryError> + Send + Sync + 'static,
    {
        self.destroy = Some(Box::new(f));
        self
    }
}

impl<T> PooledObjectFactory<T> for FnFactory<T> {
    fn make_object(&self) -> Result<T, FactoryError> {
        (self.make)()
    }

    fn destroy_object(&self, obj: PooledInstance<T>) -> Result<(), FactoryError> {
        match self.destroy {
            Some(ref destroy) => destroy(obj.into_inner()),
            None => Ok(()),
        }
    }

    fn validate_object(&self, obj: &PooledInstance<T>) -> bool {
        self.validate.as_ref().is_none_or(|validate| validate(obj.value()))
    }

    fn activate_object(&self, obj: &mut PooledInstance<T>) -> Result<(), FactoryError> {
        match self.activate {
            Some(ref activate) => activate(obj.value_mut()),
            None => Ok(()),
        }
    }

    fn passivate_object(&self, obj: &mut PooledInstance<T>) -> Result<(), FactoryError> {
        match self.passivate {
            Some(ref passivate) => passivate(obj.value_mut()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fn_factory_defaults() {
        let factory = FnFactory::new(|| Ok(5u32));
        let mut inst = PooledInstance::new(0, factory.make_object().unwrap());
        assert!(factory.validate_object(&inst));
        assert!(factory.activate_object(&mut inst).is_ok());
        assert!(factory.passivate_object(&mut inst).is_ok());
        assert!(factory.destroy_object(inst).is_ok());
    }

    #[test]
    fn test_fn_factory_hooks_see_value() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&destroyed);
        let factory = FnFactory::new(|| Ok(Vec::<u8>::new()))
            .with_activate(|v: &mut Vec<u8>| {
                v.push(1);
                Ok(())
            })
            .with_validate(|v: &Vec<u8>| v.len() < 2)
            .with_destroy(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let mut inst = PooledInstance::new(0, factory.make_object().unwrap());
        factory.activate_object(&mut inst).unwrap();
        assert!(factory.validate_object(&inst));
        factory.activate_object(&mut inst).unwrap();
        assert!(!factory.validate_object(&inst));

        factory.destroy_object(inst).unwrap();
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fn_factory_propagates_make_error() {
        let factory: FnFactory<u8> = FnFactory::new(|| Err("socket refused".into()));
        let err = factory.make_object().unwrap_err();
        assert_eq!(err.to_string(), "socket refused");
    }
}
