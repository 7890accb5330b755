//! Cluster and attribute identifiers for the application clusters we serve.

/// Matter OnOff cluster (1.5)
pub mod on_off {
    use crate::data_model::AttributeId;
    use crate::data_model::ClusterId;

    pub const CLUSTER_ID: ClusterId = 0x0006;

    #[repr(u32)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Attributes {
        OnOff = 0x0000,
        GlobalSceneControl = 0x4000,
        OnTime = 0x4001,
        OffWaitTime = 0x4002,
        StartUpOnOff = 0x4003,
    }

    impl Attributes {
        pub const fn id(self) -> AttributeId {
            self as _
        }
    }
}

/// Matter LevelControl cluster (1.6)
pub mod level_control {
    use crate::data_model::AttributeId;
    use crate::data_model::ClusterId;

    pub const CLUSTER_ID: ClusterId = 0x0008;

    /// Highest valid CurrentLevel; 255 is reserved for null.
    pub const MAX_LEVEL: u8 = 254;

    #[repr(u32)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Attributes {
        CurrentLevel = 0x0000,
        RemainingTime = 0x0001,
        MinLevel = 0x0002,
        MaxLevel = 0x0003,
        CurrentFrequency = 0x0004,
        OnLevel = 0x0011,
        StartUpCurrentLevel = 0x4000,
    }

    impl Attributes {
        pub const fn id(self) -> AttributeId {
            self as _
        }
    }
}
