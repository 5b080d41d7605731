mod paths;
mod sdk_home;

pub use paths::{AppPaths, AppPathsError};
pub use sdk_home::{
    ACTIVE_LINK_ENV, SdkLocations, WORKSPACE_ENV, default_locations, detect_sdk_home_on_path,
};
