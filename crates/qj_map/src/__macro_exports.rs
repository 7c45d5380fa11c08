//! Items referenced by `#[derive(Mappable)]` expansions. Not public API.

pub use alloc::boxed::Box;
pub use core::any::Any;
pub use core::option::Option;
pub use core::result::Result;

pub use crate::engine::assign_object;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::TypeRegistry;

    /// A registration function submitted by an `auto_register` type.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    // Submitted by this crate so `TypeRegistry::auto_register` can tell
    // whether `inventory` works on the current platform.
    inventory::submit! {
        __AutoRegisterFunc(TypeRegistry::mark_auto_registered)
    }

    pub(crate) fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
