//! Tests for the delimited-text table reader


/// Tab-separated main table with a title line above the header
pub const MAIN_TABLE_TSV: &str = "Connection catalogue\t\t\n\
Name\tCONNECTION_CODE\tProfile\tNt\tQ\tMo\tα\tβ\tγ\tδ\tε\tλ\n\
Splice A\tH2-1\t20Б1\t12\t3,5\t1.25\t1\t2\t3\t4\t5\t6\n\
Splice B\t \t20Б1\t1\t1\t1\t1\t1\t1\t1\t1\t1\n\
Splice C\tH2-2\t 30 Ш1 \t\t\t\t\t\t\t\t\t\n";

/// Unlabelled profile reference table
pub const REFERENCE_TABLE_TSV: &str = "10Б1\t100\t55\t4,1\t5,7\n\
\t1\t1\t1\t1\n\
20Б1\t200\t100\t5.6\t8.5\n";
