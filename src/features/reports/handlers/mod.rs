pub mod report_handler;

pub use report_handler::{
    __path_list_reports, __path_submit_report, __path_validate_report, list_reports,
    submit_report, validate_report, ReportState,
};
