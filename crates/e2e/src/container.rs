//! Dependency container
//!
//! Maps a type token to a lazily built singleton. Factories receive the
//! container and resolve their own dependencies, so wiring is transitive.

use parking_lot::Mutex;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::error::{E2eError, E2eResult};

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> E2eResult<Instance> + Send + Sync>;

#[derive(Default)]
pub struct Container {
    factories: HashMap<TypeId, (&'static str, Factory)>,
    instances: Mutex<HashMap<TypeId, Instance>>,
    /// Tokens currently being built on each thread, outermost first.
    /// Factories are synchronous, so a resolution chain never leaves its thread.
    resolving: Mutex<HashMap<ThreadId, Vec<(TypeId, &'static str)>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to a factory; replaces any earlier binding
    pub fn register<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> E2eResult<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |container| Ok(Arc::new(factory(container)?) as Instance));
        self.factories.insert(TypeId::of::<T>(), (type_name::<T>(), factory));
        self.instances.get_mut().remove(&TypeId::of::<T>());
        self
    }

    /// Bind `T` to an already built value
    pub fn register_instance<T>(&mut self, value: T) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        self.register_arc(Arc::new(value))
    }

    pub fn register_arc<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        self.factories.remove(&TypeId::of::<T>());
        self.instances.get_mut().insert(TypeId::of::<T>(), value as Instance);
        self
    }

    pub fn is_registered<T: Any>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.factories.contains_key(&id) || self.instances.lock().contains_key(&id)
    }

    /// Resolve `T`, building it (and its dependencies) on first use
    pub fn get<T>(&self) -> E2eResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let id = TypeId::of::<T>();

        if let Some(instance) = self.instances.lock().get(&id).cloned() {
            return downcast(instance);
        }

        let (name, factory) = self
            .factories
            .get(&id)
            .ok_or_else(|| E2eError::Resolution(format!("no binding registered for {}", type_name::<T>())))?;

        let thread = thread::current().id();
        {
            let mut stacks = self.resolving.lock();
            let resolving = stacks.entry(thread).or_default();
            if let Some(pos) = resolving.iter().position(|(token, _)| *token == id) {
                let chain: Vec<&str> = resolving[pos..]
                    .iter()
                    .map(|(_, n)| *n)
                    .chain(std::iter::once(*name))
                    .collect();
                return Err(E2eError::Resolution(format!(
                    "dependency cycle: {}",
                    chain.join(" -> ")
                )));
            }
            resolving.push((id, name));
        }

        let built = factory(self);
        {
            let mut stacks = self.resolving.lock();
            if let Some(resolving) = stacks.get_mut(&thread) {
                resolving.pop();
                if resolving.is_empty() {
                    stacks.remove(&thread);
                }
            }
        }
        let built = built?;

        let instance = self.instances.lock().entry(id).or_insert(built).clone();
        downcast(instance)
    }
}

fn downcast<T: Any + Send + Sync>(instance: Instance) -> E2eResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| E2eError::Resolution(format!("binding for {} has the wrong type", type_name::<T>())))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock(u64);

    struct Service {
        clock: Arc<Clock>,
    }

    struct Ping;
    struct Pong;

    #[test]
    fn test_unregistered_token_fails() {
        let container = Container::new();
        let err = container.get::<Clock>().err().unwrap();
        assert!(matches!(err, E2eError::Resolution(_)));
        assert!(err.to_string().contains("Clock"));
    }

    #[test]
    fn test_transitive_singletons() {
        let mut container = Container::new();
        container
            .register_instance(Clock(42))
            .register(|c| Ok(Service { clock: c.get::<Clock>()? }));

        let a = container.get::<Service>().unwrap();
        let b = container.get::<Service>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a.clock, &container.get::<Clock>().unwrap()));
        assert_eq!(a.clock.0, 42);
    }

    #[test]
    fn test_missing_dependency_propagates() {
        let mut container = Container::new();
        container.register(|c| Ok(Service { clock: c.get::<Clock>()? }));
        assert!(matches!(container.get::<Service>(), Err(E2eError::Resolution(_))));
        assert!(container.is_registered::<Service>());
        assert!(!container.is_registered::<Clock>());
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut container = Container::new();
        container
            .register(|c| {
                c.get::<Pong>()?;
                Ok(Ping)
            })
            .register(|c| {
                c.get::<Ping>()?;
                Ok(Pong)
            });

        let err = container.get::<Ping>().err().unwrap();
        let message = err.to_string();
        assert!(message.contains("dependency cycle"), "{}", message);
        assert!(message.contains("Ping -> "), "{}", message);

        // Nothing is left half-resolved after the failure
        assert!(container.resolving.lock().is_empty());
    }

    #[test]
    fn test_concurrent_resolution_is_not_a_cycle() {
        let mut container = Container::new();
        container.register(|_| {
            std::thread::sleep(std::time::Duration::from_millis(50));
            Ok(Clock(7))
        });

        let start = std::sync::Barrier::new(2);
        let (a, b) = std::thread::scope(|s| {
            let resolve = || {
                start.wait();
                container.get::<Clock>()
            };
            let a = s.spawn(resolve);
            let b = s.spawn(resolve);
            (a.join().unwrap(), b.join().unwrap())
        });

        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.0, 7);
        assert!(container.resolving.lock().is_empty());
    }
}
