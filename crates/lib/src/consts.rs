/// The lockfile-driven dependency manager the plugin wraps.
pub const POETRY: &str = "poetry";

/// Installer used when poetry is missing from the search path.
pub const POETRY_INSTALLER_URL: &str = "https://install.python-poetry.org";

/// System package that provides poetry on the build host.
pub const POETRY_PACKAGE: &str = "python3-poetry";

/// Network transfer utility needed to fetch the poetry installer.
pub const CURL_PACKAGE: &str = "curl";

/// Name of the exported requirements file inside the build tree.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Subdirectories copied from the build tree into the install tree, in order.
pub const COPIED_DIRS: [&str; 2] = ["src", "lib"];

/// Directory under the install tree holding the charm's virtual environment.
pub const VENV_DIR: &str = "venv";

pub const ENV_PATH: &str = "PATH";
pub const ENV_PIP_NO_BINARY: &str = "PIP_NO_BINARY";
pub const ENV_PYTHON_INTERPRETER: &str = "PARTS_PYTHON_INTERPRETER";
pub const ENV_PYTHON_VENV_ARGS: &str = "PARTS_PYTHON_VENV_ARGS";
pub const ENV_PYTHON_VENV_INTERP_PATH: &str = "PARTS_PYTHON_VENV_INTERP_PATH";
