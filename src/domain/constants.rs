pub const TOOL_NAME: &str = "about-code-tool";

pub const LOG_FILENAME: &str = "error.log";
pub const ABOUT_EXTENSION: &str = ".ABOUT";
pub const LICENSE_EXTENSION: &str = ".LICENSE";

pub const FORMATS: [&str; 2] = ["csv", "json"];

pub const ABOUT_FILE_PATH_ATTR: &str = "about_file_path";

/// Standard ABOUT fields in their canonical serialization order.
pub const STANDARD_FIELDS: [&str; 36] = [
    "about_resource",
    "name",
    "version",
    "download_url",
    "description",
    "homepage_url",
    "notes",
    "license_expression",
    "license_key",
    "license_name",
    "license_file",
    "license_url",
    "copyright",
    "notice_file",
    "notice_url",
    "redistribute",
    "attribute",
    "track_changes",
    "modified",
    "internal_use_only",
    "changelog_file",
    "owner",
    "owner_url",
    "contact",
    "author",
    "author_file",
    "vcs_tool",
    "vcs_repository",
    "vcs_path",
    "vcs_tag",
    "vcs_branch",
    "vcs_revision",
    "checksum_md5",
    "checksum_sha1",
    "checksum_sha256",
    "spec_version",
];

pub const REQUIRED_FIELDS: [&str; 2] = ["about_resource", "name"];

/// Fields holding one path per line, resolved relative to the ABOUT file.
pub const FILE_FIELDS: [&str; 4] = ["license_file", "notice_file", "changelog_file", "author_file"];

pub const FLAG_FIELDS: [&str; 5] = [
    "redistribute",
    "attribute",
    "track_changes",
    "modified",
    "internal_use_only",
];

pub const TRUE_FLAGS: [&str; 4] = ["yes", "y", "true", "x"];
pub const FALSE_FLAGS: [&str; 3] = ["no", "n", "false"];

/// License fields that are grouped under `licenses` in ABOUT and JSON output.
pub const LICENSE_GROUP: [(&str, &str); 4] = [
    ("license_key", "key"),
    ("license_name", "name"),
    ("license_file", "file"),
    ("license_url", "url"),
];

pub const UNSUPPORTED_EXPRESSION_CHARS: [char; 22] = [
    '!', '@', '#', '$', '%', '^', '&', '*', '=', '{', '}', '|', '[', ']', '\\', ':', ';', '<', '>',
    '?', ',', '/',
];

pub const AUTH_DENIED_MSG: &str =
    "Authorization denied. Invalid '--api_key'. License generation is skipped.";

pub const DEFAULT_API_TIMEOUT_MS: u64 = 5000;

pub const TEMPLATE_COMPONENTS: &str = "{{ components }}";
pub const TEMPLATE_TOOL_VERSION: &str = "{{ tool_version }}";
