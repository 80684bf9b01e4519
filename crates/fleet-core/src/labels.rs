//! Well-known label keys, resource names and label values.

pub const LABEL_INSTANCE_TYPE: &str = "node.kubernetes.io/instance-type";
pub const LABEL_ARCH: &str = "kubernetes.io/arch";
pub const LABEL_OS: &str = "kubernetes.io/os";
pub const LABEL_ZONE: &str = "topology.kubernetes.io/zone";
pub const LABEL_CAPACITY_TYPE: &str = "karpenter.sh/capacity-type";
pub const LABEL_NODE_NAME: &str = "fleetgrid.dev/node-name";

/// Size class of an instance type (`small` / `large`).
pub const LABEL_INSTANCE_SIZE: &str = "size";
/// Opt-in label carried only by large instance types.
pub const LABEL_EXOTIC: &str = "special";
/// Whole CPU count, usable with `Gt` / `Lt`.
pub const LABEL_INTEGER: &str = "integer";

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";
pub const RESOURCE_PODS: &str = "pods";
pub const RESOURCE_GPU_VENDOR_A: &str = "fake.com/vendor-a";
pub const RESOURCE_GPU_VENDOR_B: &str = "fake.com/vendor-b";

pub const ARCH_AMD64: &str = "amd64";
pub const ARCH_ARM64: &str = "arm64";

pub const OS_LINUX: &str = "linux";
pub const OS_WINDOWS: &str = "windows";
pub const OS_DARWIN: &str = "darwin";

pub const CAPACITY_SPOT: &str = "spot";
pub const CAPACITY_ON_DEMAND: &str = "on-demand";

pub const EXOTIC_OPTIONAL: &str = "optional";
