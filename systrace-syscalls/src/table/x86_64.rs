/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Linux x86_64 syscall signatures, from `arch/x86/entry/syscalls/syscall_64.tbl`
//! and the man pages. Numbers 335 through 423 are unused on x86_64.

use super::SyscallSignature;

pub(super) static SIGNATURES: &[SyscallSignature] = signatures! {
    0 read(Fd, Pointer, Size),
    1 write(Fd, Pointer, Size),
    2 open(Str, Flags, VarArgs),
    3 close(Fd),
    4 stat(Str, Pointer),
    5 fstat(Fd, Pointer),
    6 lstat(Str, Pointer),
    7 poll(Pointer, Uint, Int),
    8 lseek(Fd, Offset, Int),
    9 mmap(Pointer, Size, Int, Flags, Fd, Offset),
    10 mprotect(Pointer, Size, Int),
    11 munmap(Pointer, Size),
    12 brk(Pointer),
    13 rt_sigaction(Int, Pointer, Pointer, Size),
    14 rt_sigprocmask(Int, Pointer, Pointer, Size),
    15 rt_sigreturn(Void),
    16 ioctl(Fd, Ulong, VarArgs),
    17 pread64(Fd, Pointer, Size, Offset),
    18 pwrite64(Fd, Pointer, Size, Offset),
    19 readv(Fd, Pointer, Int),
    20 writev(Fd, Pointer, Int),
    21 access(Str, Mode),
    22 pipe(Pointer),
    23 select(Int, Pointer, Pointer, Pointer, Pointer),
    24 sched_yield(Void),
    25 mremap(Pointer, Size, Size, Flags, VarArgs),
    26 msync(Pointer, Size, Flags),
    27 mincore(Pointer, Size, Pointer),
    28 madvise(Pointer, Size, Int),
    29 shmget(Int, Size, Flags),
    30 shmat(Int, Pointer, Flags),
    31 shmctl(Int, Int, Pointer),
    32 dup(Fd),
    33 dup2(Fd, Fd),
    34 pause(Void),
    35 nanosleep(Pointer, Pointer),
    36 getitimer(Int, Pointer),
    37 alarm(Uint),
    38 setitimer(Int, Pointer, Pointer),
    39 getpid(Void),
    40 sendfile(Fd, Fd, Pointer, Size),
    41 socket(Int, Int, Int),
    42 connect(Fd, Pointer, Uint),
    43 accept(Fd, Pointer, Pointer),
    44 sendto(Fd, Pointer, Size, Flags, Pointer, Uint),
    45 recvfrom(Fd, Pointer, Size, Flags, Pointer, Pointer),
    46 sendmsg(Fd, Pointer, Flags),
    47 recvmsg(Fd, Pointer, Flags),
    48 shutdown(Fd, Int),
    49 bind(Fd, Pointer, Uint),
    50 listen(Fd, Int),
    51 getsockname(Fd, Pointer, Pointer),
    52 getpeername(Fd, Pointer, Pointer),
    53 socketpair(Int, Int, Int, Pointer),
    54 setsockopt(Fd, Int, Int, Pointer, Uint),
    55 getsockopt(Fd, Int, Int, Pointer, Pointer),
    56 clone(Flags, Pointer, Pointer, Pointer, Ulong),
    57 fork(Void),
    58 vfork(Void),
    59 execve(Str, Pointer, Pointer),
    60 exit(Int),
    61 wait4(Pid, Pointer, Flags, Pointer),
    62 kill(Pid, Int),
    63 uname(Pointer),
    64 semget(Int, Int, Flags),
    65 semop(Int, Pointer, Size),
    66 semctl(Int, Int, Int, VarArgs),
    67 shmdt(Pointer),
    68 msgget(Int, Flags),
    69 msgsnd(Int, Pointer, Size, Flags),
    70 msgrcv(Int, Pointer, Size, Long, Flags),
    71 msgctl(Int, Int, Pointer),
    72 fcntl(Fd, Int, VarArgs),
    73 flock(Fd, Int),
    74 fsync(Fd),
    75 fdatasync(Fd),
    76 truncate(Str, Offset),
    77 ftruncate(Fd, Offset),
    78 getdents(Fd, Pointer, Uint),
    79 getcwd(Pointer, Size),
    80 chdir(Str),
    81 fchdir(Fd),
    82 rename(Str, Str),
    83 mkdir(Str, Mode),
    84 rmdir(Str),
    85 creat(Str, Mode),
    86 link(Str, Str),
    87 unlink(Str),
    88 symlink(Str, Str),
    89 readlink(Str, Pointer, Size),
    90 chmod(Str, Mode),
    91 fchmod(Fd, Mode),
    92 chown(Str, Uint, Uint),
    93 fchown(Fd, Uint, Uint),
    94 lchown(Str, Uint, Uint),
    95 umask(Mode),
    96 gettimeofday(Pointer, Pointer),
    97 getrlimit(Int, Pointer),
    98 getrusage(Int, Pointer),
    99 sysinfo(Pointer),
    100 times(Pointer),
    101 ptrace(Long, Pid, Pointer, Pointer),
    102 getuid(Void),
    103 syslog(Int, Pointer, Int),
    104 getgid(Void),
    105 setuid(Uint),
    106 setgid(Uint),
    107 geteuid(Void),
    108 getegid(Void),
    109 setpgid(Pid, Pid),
    110 getppid(Void),
    111 getpgrp(Void),
    112 setsid(Void),
    113 setreuid(Uint, Uint),
    114 setregid(Uint, Uint),
    115 getgroups(Int, Pointer),
    116 setgroups(Size, Pointer),
    117 setresuid(Uint, Uint, Uint),
    118 getresuid(Pointer, Pointer, Pointer),
    119 setresgid(Uint, Uint, Uint),
    120 getresgid(Pointer, Pointer, Pointer),
    121 getpgid(Pid),
    122 setfsuid(Uint),
    123 setfsgid(Uint),
    124 getsid(Pid),
    125 capget(Pointer, Pointer),
    126 capset(Pointer, Pointer),
    127 rt_sigpending(Pointer, Size),
    128 rt_sigtimedwait(Pointer, Pointer, Pointer, Size),
    129 rt_sigqueueinfo(Pid, Int, Pointer),
    130 rt_sigsuspend(Pointer, Size),
    131 sigaltstack(Pointer, Pointer),
    132 utime(Str, Pointer),
    133 mknod(Str, Mode, Ulong),
    134 uselib(Str),
    135 personality(Ulong),
    136 ustat(Ulong, Pointer),
    137 statfs(Str, Pointer),
    138 fstatfs(Fd, Pointer),
    139 sysfs(Int, VarArgs),
    140 getpriority(Int, Uint),
    141 setpriority(Int, Uint, Int),
    142 sched_setparam(Pid, Pointer),
    143 sched_getparam(Pid, Pointer),
    144 sched_setscheduler(Pid, Int, Pointer),
    145 sched_getscheduler(Pid),
    146 sched_get_priority_max(Int),
    147 sched_get_priority_min(Int),
    148 sched_rr_get_interval(Pid, Pointer),
    149 mlock(Pointer, Size),
    150 munlock(Pointer, Size),
    151 mlockall(Flags),
    152 munlockall(Void),
    153 vhangup(Void),
    154 modify_ldt(Int, Pointer, Ulong),
    155 pivot_root(Str, Str),
    156 _sysctl(Pointer),
    157 prctl(Int, Ulong, Ulong, Ulong, Ulong),
    158 arch_prctl(Int, Ulong),
    159 adjtimex(Pointer),
    160 setrlimit(Int, Pointer),
    161 chroot(Str),
    162 sync(Void),
    163 acct(Str),
    164 settimeofday(Pointer, Pointer),
    165 mount(Str, Str, Str, Flags, Pointer),
    166 umount2(Str, Flags),
    167 swapon(Str, Flags),
    168 swapoff(Str),
    169 reboot(Int, Int, Int, Pointer),
    170 sethostname(Str, Size),
    171 setdomainname(Str, Size),
    172 iopl(Int),
    173 ioperm(Ulong, Ulong, Int),
    174 create_module(Str, Size),
    175 init_module(Pointer, Ulong, Str),
    176 delete_module(Str, Flags),
    177 get_kernel_syms(Pointer),
    178 query_module(Str, Int, Pointer, Size, Pointer),
    179 quotactl(Int, Str, Int, Pointer),
    180 nfsservctl(Int, Pointer, Pointer),
    // 181 through 185 were never implemented.
    181 getpmsg(Void),
    182 putpmsg(Void),
    183 afs_syscall(Void),
    184 tuxcall(Void),
    185 security(Void),
    186 gettid(Void),
    187 readahead(Fd, Offset, Size),
    188 setxattr(Str, Str, Pointer, Size, Flags),
    189 lsetxattr(Str, Str, Pointer, Size, Flags),
    190 fsetxattr(Fd, Str, Pointer, Size, Flags),
    191 getxattr(Str, Str, Pointer, Size),
    192 lgetxattr(Str, Str, Pointer, Size),
    193 fgetxattr(Fd, Str, Pointer, Size),
    194 listxattr(Str, Pointer, Size),
    195 llistxattr(Str, Pointer, Size),
    196 flistxattr(Fd, Pointer, Size),
    197 removexattr(Str, Str),
    198 lremovexattr(Str, Str),
    199 fremovexattr(Fd, Str),
    200 tkill(Pid, Int),
    201 time(Pointer),
    202 futex(Pointer, Int, Uint, Pointer, Pointer, Uint),
    203 sched_setaffinity(Pid, Size, Pointer),
    204 sched_getaffinity(Pid, Size, Pointer),
    205 set_thread_area(Pointer),
    206 io_setup(Uint, Pointer),
    207 io_destroy(Ulong),
    208 io_getevents(Ulong, Long, Long, Pointer, Pointer),
    209 io_submit(Ulong, Long, Pointer),
    210 io_cancel(Ulong, Pointer, Pointer),
    211 get_thread_area(Pointer),
    212 lookup_dcookie(Ulong, Pointer, Size),
    213 epoll_create(Int),
    214 epoll_ctl_old(Void),
    215 epoll_wait_old(Void),
    216 remap_file_pages(Pointer, Size, Int, Size, Flags),
    217 getdents64(Fd, Pointer, Uint),
    218 set_tid_address(Pointer),
    219 restart_syscall(Void),
    220 semtimedop(Int, Pointer, Size, Pointer),
    221 fadvise64(Fd, Offset, Size, Int),
    222 timer_create(Int, Pointer, Pointer),
    223 timer_settime(Int, Flags, Pointer, Pointer),
    224 timer_gettime(Int, Pointer),
    225 timer_getoverrun(Int),
    226 timer_delete(Int),
    227 clock_settime(Int, Pointer),
    228 clock_gettime(Int, Pointer),
    229 clock_getres(Int, Pointer),
    230 clock_nanosleep(Int, Flags, Pointer, Pointer),
    231 exit_group(Int),
    232 epoll_wait(Fd, Pointer, Int, Int),
    233 epoll_ctl(Fd, Int, Fd, Pointer),
    234 tgkill(Pid, Pid, Int),
    235 utimes(Str, Pointer),
    236 vserver(Void),
    237 mbind(Pointer, Ulong, Int, Pointer, Ulong, Flags),
    238 set_mempolicy(Int, Pointer, Ulong),
    239 get_mempolicy(Pointer, Pointer, Ulong, Pointer, Flags),
    240 mq_open(Str, Flags, VarArgs),
    241 mq_unlink(Str),
    242 mq_timedsend(Fd, Pointer, Size, Uint, Pointer),
    243 mq_timedreceive(Fd, Pointer, Size, Pointer, Pointer),
    244 mq_notify(Fd, Pointer),
    245 mq_getsetattr(Fd, Pointer, Pointer),
    246 kexec_load(Ulong, Ulong, Pointer, Flags),
    247 waitid(Int, Pid, Pointer, Flags, Pointer),
    248 add_key(Str, Str, Pointer, Size, Int),
    249 request_key(Str, Str, Str, Int),
    250 keyctl(Int, VarArgs),
    251 ioprio_set(Int, Int, Int),
    252 ioprio_get(Int, Int),
    253 inotify_init(Void),
    254 inotify_add_watch(Fd, Str, Flags),
    255 inotify_rm_watch(Fd, Int),
    256 migrate_pages(Pid, Ulong, Pointer, Pointer),
    257 openat(Fd, Str, Flags, VarArgs),
    258 mkdirat(Fd, Str, Mode),
    259 mknodat(Fd, Str, Mode, Ulong),
    260 fchownat(Fd, Str, Uint, Uint, Flags),
    261 futimesat(Fd, Str, Pointer),
    262 newfstatat(Fd, Str, Pointer, Flags),
    263 unlinkat(Fd, Str, Flags),
    264 renameat(Fd, Str, Fd, Str),
    265 linkat(Fd, Str, Fd, Str, Flags),
    266 symlinkat(Str, Fd, Str),
    267 readlinkat(Fd, Str, Pointer, Size),
    268 fchmodat(Fd, Str, Mode),
    269 faccessat(Fd, Str, Mode),
    270 pselect6(Int, Pointer, Pointer, Pointer, Pointer, Pointer),
    271 ppoll(Pointer, Uint, Pointer, Pointer, Size),
    272 unshare(Flags),
    273 set_robust_list(Pointer, Size),
    274 get_robust_list(Pid, Pointer, Pointer),
    275 splice(Fd, Pointer, Fd, Pointer, Size, Flags),
    276 tee(Fd, Fd, Size, Flags),
    277 sync_file_range(Fd, Offset, Offset, Flags),
    278 vmsplice(Fd, Pointer, Ulong, Flags),
    279 move_pages(Pid, Ulong, Pointer, Pointer, Pointer, Flags),
    280 utimensat(Fd, Str, Pointer, Flags),
    281 epoll_pwait(Fd, Pointer, Int, Int, Pointer, Size),
    282 signalfd(Fd, Pointer, Size),
    283 timerfd_create(Int, Flags),
    284 eventfd(Uint),
    285 fallocate(Fd, Int, Offset, Offset),
    286 timerfd_settime(Fd, Flags, Pointer, Pointer),
    287 timerfd_gettime(Fd, Pointer),
    288 accept4(Fd, Pointer, Pointer, Flags),
    289 signalfd4(Fd, Pointer, Size, Flags),
    290 eventfd2(Uint, Flags),
    291 epoll_create1(Flags),
    292 dup3(Fd, Fd, Flags),
    293 pipe2(Pointer, Flags),
    294 inotify_init1(Flags),
    295 preadv(Fd, Pointer, Int, Ulong, Ulong),
    296 pwritev(Fd, Pointer, Int, Ulong, Ulong),
    297 rt_tgsigqueueinfo(Pid, Pid, Int, Pointer),
    298 perf_event_open(Pointer, Pid, Int, Fd, Flags),
    299 recvmmsg(Fd, Pointer, Uint, Flags, Pointer),
    300 fanotify_init(Flags, Flags),
    301 fanotify_mark(Fd, Flags, Ulong, Fd, Str),
    302 prlimit64(Pid, Int, Pointer, Pointer),
    303 name_to_handle_at(Fd, Str, Pointer, Pointer, Flags),
    304 open_by_handle_at(Fd, Pointer, Flags),
    305 clock_adjtime(Int, Pointer),
    306 syncfs(Fd),
    307 sendmmsg(Fd, Pointer, Uint, Flags),
    308 setns(Fd, Int),
    309 getcpu(Pointer, Pointer, Pointer),
    310 process_vm_readv(Pid, Pointer, Ulong, Pointer, Ulong, Flags),
    311 process_vm_writev(Pid, Pointer, Ulong, Pointer, Ulong, Flags),
    312 kcmp(Pid, Pid, Int, Ulong, Ulong),
    313 finit_module(Fd, Str, Flags),
    314 sched_setattr(Pid, Pointer, Flags),
    315 sched_getattr(Pid, Pointer, Uint, Flags),
    316 renameat2(Fd, Str, Fd, Str, Flags),
    317 seccomp(Uint, Flags, Pointer),
    318 getrandom(Pointer, Size, Flags),
    319 memfd_create(Str, Flags),
    320 kexec_file_load(Fd, Fd, Ulong, Str, Flags),
    321 bpf(Int, Pointer, Uint),
    322 execveat(Fd, Str, Pointer, Pointer, Flags),
    323 userfaultfd(Flags),
    324 membarrier(Int, Flags, Int),
    325 mlock2(Pointer, Size, Flags),
    326 copy_file_range(Fd, Pointer, Fd, Pointer, Size, Flags),
    327 preadv2(Fd, Pointer, Int, Ulong, Ulong, Flags),
    328 pwritev2(Fd, Pointer, Int, Ulong, Ulong, Flags),
    329 pkey_mprotect(Pointer, Size, Int, Int),
    330 pkey_alloc(Flags, Uint),
    331 pkey_free(Int),
    332 statx(Fd, Str, Flags, Uint, Pointer),
    333 io_pgetevents(Ulong, Long, Long, Pointer, Pointer, Pointer),
    334 rseq(Pointer, Uint, Flags, Uint),
    424 pidfd_send_signal(Fd, Int, Pointer, Flags),
    425 io_uring_setup(Uint, Pointer),
    426 io_uring_enter(Fd, Uint, Uint, Flags, Pointer, Size),
    427 io_uring_register(Fd, Uint, Pointer, Uint),
    428 open_tree(Fd, Str, Flags),
    429 move_mount(Fd, Str, Fd, Str, Flags),
    430 fsopen(Str, Flags),
    431 fsconfig(Fd, Uint, Str, Pointer, Int),
    432 fsmount(Fd, Flags, Uint),
    433 fspick(Fd, Str, Flags),
    434 pidfd_open(Pid, Flags),
    435 clone3(Pointer, Size),
    436 close_range(Fd, Fd, Flags),
    437 openat2(Fd, Str, Pointer, Size),
    438 pidfd_getfd(Fd, Fd, Flags),
    439 faccessat2(Fd, Str, Mode, Flags),
    440 process_madvise(Fd, Pointer, Size, Int, Flags),
    441 epoll_pwait2(Fd, Pointer, Int, Pointer, Pointer, Size),
    442 mount_setattr(Fd, Str, Flags, Pointer, Size),
    443 quotactl_fd(Fd, Uint, Uint, Pointer),
    444 landlock_create_ruleset(Pointer, Size, Flags),
    445 landlock_add_rule(Fd, Int, Pointer, Flags),
    446 landlock_restrict_self(Fd, Flags),
    447 memfd_secret(Flags),
    448 process_mrelease(Fd, Flags),
    449 futex_waitv(Pointer, Uint, Flags, Pointer, Int),
    450 set_mempolicy_home_node(Ulong, Ulong, Ulong, Flags),
    451 cachestat(Fd, Pointer, Pointer, Flags),
    452 fchmodat2(Fd, Str, Mode, Flags),
    453 map_shadow_stack(Pointer, Ulong, Flags),
    454 futex_wake(Pointer, Ulong, Int, Flags),
    455 futex_wait(Pointer, Ulong, Ulong, Flags, Pointer, Int),
    456 futex_requeue(Pointer, Flags, Int, Int),
    457 statmount(Pointer, Pointer, Size, Flags),
    458 listmount(Pointer, Pointer, Size, Flags),
    459 lsm_get_self_attr(Uint, Pointer, Pointer, Flags),
    460 lsm_set_self_attr(Uint, Pointer, Size, Flags),
    461 lsm_list_modules(Pointer, Pointer, Flags),
    462 mseal(Pointer, Size, Flags),
};
