//! Typed remote services, one per backend resource family. Each method
//! maps to exactly one endpoint; caching and invalidation live a layer
//! above in [`crate::store`].

pub mod catalogo;
pub mod inventario;
pub mod productos;
pub mod usuarios;

pub use catalogo::CatalogoService;
pub use inventario::InventarioService;
pub use productos::ProductoService;
pub use usuarios::{AuthService, UserService};
