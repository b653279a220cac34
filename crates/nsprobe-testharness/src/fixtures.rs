//! ---
//! nsp_section: "06-test-harness"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Probe scenarios, setup and reporting."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
/// Minimal XHTML page with exactly one `html` element in the XHTML namespace.
pub const XHTML_TEST_PAGE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE html>\n\
<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\">\n\
<head><title>Test Page</title></head>\n\
<body><h1>Test Page</h1></body>\n\
</html>";

/// Content type the test page is loaded as.
pub const XHTML_CONTENT_TYPE: &str = "application/xhtml+xml";
