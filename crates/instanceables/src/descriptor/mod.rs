pub mod class;
pub mod parameter;
pub mod instantiation;


pub use class::{ClassDesc, ConstructorDesc, ConstructorFn, SetterFn};
pub use instantiation::{InstantiationBuilder, InstantiationDescriptor};
pub use parameter::{ParameterDescriptor, SetterDescriptor};
