pub mod attributes;
pub mod event;
pub mod record;

pub use attributes::{mapping_for, AttributeMapping, ATTRIBUTE_MAPPINGS};
pub use event::{EventType, InboundEvent};
pub use record::{source_name, SourceData, SENSOR_CLASS, SIGNATURE_SEPARATOR};
