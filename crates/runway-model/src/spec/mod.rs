mod limits;
pub use limits::ResourceLimits;

mod workload;
pub use workload::{ContainerSpec, WorkloadSpec};

mod service;
pub use service::{Protocol, ServicePort, ServiceSpec};

mod route;
pub use route::{PathType, RouteBackend, RouteSpec, RouteTls};

mod bundle;
pub use bundle::{BundleMember, RunnerBundle};
