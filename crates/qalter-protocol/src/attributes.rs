//! Attribute identifiers understood by batch servers.

/// Time after which the job becomes eligible to run (`-a`).
pub const EXECUTION_TIME: &str = "Execution_Time";
/// Accounting string (`-A`).
pub const ACCOUNT_NAME: &str = "Account_Name";
/// Checkpoint interval (`-c`).
pub const CHECKPOINT: &str = "Checkpoint";
/// Standard error destination (`-e`).
pub const ERROR_PATH: &str = "Error_Path";
/// Holds applied to the job (`-h`).
pub const HOLD_TYPES: &str = "Hold_Types";
/// Whether output and error streams are joined (`-j`).
pub const JOIN_PATH: &str = "Join_Path";
/// Which output streams are retained on the execution host (`-k`).
pub const KEEP_FILES: &str = "Keep_Files";
/// Sub-job index range of an array job (`-J`).
pub const ARRAY_INDICES: &str = "array_indices_submitted";
/// Resource requests, subscripted by resource name (`-l`).
pub const RESOURCE_LIST: &str = "Resource_List";
/// Events that trigger mail (`-m`).
pub const MAIL_POINTS: &str = "Mail_Points";
/// Mail recipients (`-M`).
pub const MAIL_USERS: &str = "Mail_Users";
/// Job name (`-N`).
pub const JOB_NAME: &str = "Job_Name";
/// Standard output destination (`-o`).
pub const OUTPUT_PATH: &str = "Output_Path";
/// Job priority (`-p`).
pub const PRIORITY: &str = "Priority";
/// Project the job is charged to (`-P`).
pub const PROJECT: &str = "project";
/// Whether the job may be rerun (`-r`).
pub const RERUNABLE: &str = "Rerunable";
/// Shell used to run the job script (`-S`).
pub const SHELL_PATH_LIST: &str = "Shell_Path_List";
/// User names the job may run as (`-u`).
pub const USER_LIST: &str = "User_List";

/// Inter-job dependencies (`-W depend=`).
pub const DEPEND: &str = "depend";
/// Files staged in before execution (`-W stagein=`).
pub const STAGE_IN: &str = "stagein";
/// Files staged out after execution (`-W stageout=`).
pub const STAGE_OUT: &str = "stageout";
/// Staging and execution directory policy (`-W sandbox=`).
pub const SANDBOX: &str = "sandbox";
/// File creation mask (`-W umask=`).
pub const UMASK: &str = "umask";
/// Number of times the job has been run (`-W run_count=`).
pub const RUN_COUNT: &str = "run_count";
/// Group names the job may run as (`-W group_list=`).
pub const GROUP_LIST: &str = "group_list";
