mod dialogue_run;
mod failure_policy;
